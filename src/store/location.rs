use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AgcelError;
use crate::model::LocationConfig;

pub const PROJECT_DIR: &str = ".agc";
pub const GLOBAL_DIR: &str = ".agcel";
const CONFIG_FILE: &str = "config.json";
const PID_FILE: &str = "mcp-server.pid";
const LOG_FILE: &str = "server.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    Project,
    Global,
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// An AgCel directory (project `.agc` or global `~/.agcel`) and its config.
#[derive(Debug, Clone)]
pub struct Location {
    root: PathBuf,
    kind: LocationKind,
    config: LocationConfig,
}

impl Location {
    pub fn open(root: PathBuf, kind: LocationKind) -> Self {
        let config = load_config(&root.join(CONFIG_FILE));
        Self { root, kind, config }
    }

    /// The project location when `.agc` exists in `project_dir`, else the
    /// global location when it exists.
    pub fn resolve(project_dir: &Path, global_dir: &Path) -> Result<Self, AgcelError> {
        let project = project_dir.join(PROJECT_DIR);
        if project.is_dir() {
            return Ok(Self::open(project, LocationKind::Project));
        }
        if global_dir.is_dir() {
            return Ok(Self::open(global_dir.to_path_buf(), LocationKind::Global));
        }
        Err(AgcelError::NotInitialized)
    }

    /// Create `.agc` and a default `config.json` when absent. Existing
    /// content is left alone. Returns whether the directory was created.
    pub fn init_project(project_dir: &Path) -> Result<(Self, bool), AgcelError> {
        let root = project_dir.join(PROJECT_DIR);
        let created = !root.exists();
        fs::create_dir_all(&root).map_err(|source| AgcelError::DirCreate {
            path: root.clone(),
            source,
        })?;

        let location = Self::open(root, LocationKind::Project);
        if !location.config_path().exists() {
            location.save_config()?;
        }
        Ok((location, created))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> LocationKind {
        self.kind
    }

    pub fn config(&self) -> &LocationConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut LocationConfig {
        &mut self.config
    }

    pub fn save_config(&self) -> Result<(), AgcelError> {
        let path = self.config_path();
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&path, content + "\n").map_err(|source| AgcelError::FileWrite { path, source })
    }

    pub fn skills_dir(&self) -> PathBuf {
        self.root.join(&self.config.skills_dir)
    }

    pub fn workflows_dir(&self) -> PathBuf {
        self.root.join(&self.config.workflows_dir)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn pid_path(&self) -> PathBuf {
        self.root.join(PID_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }
}

pub fn default_global_dir() -> Result<PathBuf, AgcelError> {
    dirs::home_dir()
        .map(|home| home.join(GLOBAL_DIR))
        .ok_or(AgcelError::HomeDirNotFound)
}

fn load_config(path: &Path) -> LocationConfig {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return LocationConfig::default(),
    };
    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            LocationConfig::default()
        }
    }
}
