use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgcelError {
    #[error("failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory: {path}")]
    DirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {path}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to link {link} -> {target}")]
    Symlink {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read answer from stdin")]
    Prompt(#[source] std::io::Error),

    #[error("AgCel is not initialized here; run `agc init` (or `agc install` for a global setup) first")]
    NotInitialized,

    #[error("global install not found at {0}; run `agc install` first")]
    GlobalInstallMissing(PathBuf),

    #[error("failed to determine home directory; set AGCEL_GLOBAL_DIR or --global-dir")]
    HomeDirNotFound,

    #[error("could not locate bundled skills; set AGCEL_PACKAGE_ROOT or pass --package-root")]
    PackageRootNotFound,

    #[error("failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("failed to spawn {program}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to signal process {pid}")]
    Signal {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
}
