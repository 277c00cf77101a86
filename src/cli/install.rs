use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::model::InstallRecord;
use crate::store::HostConfig;
use crate::store::package;
use crate::store::registry::{SERVER_NAME, ServerEntry};
use crate::store::sync::{copy_tree, remove_path};

const INSTALL_FILE: &str = "install.json";

pub fn run(
    global_dir: Option<&Path>,
    mcp_config: Option<&Path>,
    package_root: Option<PathBuf>,
) -> Result<()> {
    let global = super::global_dir(global_dir)?;
    let package_root = package::resolve_root(package_root.as_deref())
        .context("failed to locate bundled skills and workflows")?;
    if same_path(&package_root, &global) {
        bail!(
            "package root {} is the global directory; pass --package-root",
            package_root.display()
        );
    }

    println!("Installing AgCel globally...");
    if global.exists() {
        println!("Global directory already exists at {}. Updating...", global.display());
    } else {
        println!("Creating global directory at {}...", global.display());
    }
    fs::create_dir_all(&global)
        .with_context(|| format!("failed to create {}", global.display()))?;

    let command = install_executable(&global)?;

    let payload = [
        ("skills", package::skills_source(&package_root)),
        ("workflows", package::workflows_source(&package_root)),
    ];
    for (name, source) in payload {
        let dest = global.join(name);
        match source {
            Some(source) => {
                println!("Copying {name} to {}...", dest.display());
                remove_path(&dest)?;
                copy_tree(&source, &dest)
                    .with_context(|| format!("failed to copy {name} from {}", source.display()))?;
            }
            None => eprintln!(
                "warning: no {name} found in {}, skipping",
                package_root.display()
            ),
        }
    }

    let record = InstallRecord::new(package_root);
    let record_path = global.join(INSTALL_FILE);
    fs::write(&record_path, serde_json::to_string_pretty(&record)? + "\n")
        .with_context(|| format!("failed to write {}", record_path.display()))?;

    let host = HostConfig::new(super::host_config_path(mcp_config)?);
    let entry = ServerEntry {
        command: command.display().to_string(),
        args: vec!["serve".to_string()],
        env: BTreeMap::from([(
            "AGCEL_GLOBAL_DIR".to_string(),
            global.display().to_string(),
        )]),
    };
    host.upsert(SERVER_NAME, &entry)
        .context("failed to register MCP server")?;
    println!("Registered AgCel MCP server in {}", host.path().display());

    println!("AgCel installed successfully!");
    println!("Run `agc init` in your projects to set them up.");
    Ok(())
}

/// Copy the running executable to `<global>/dist`. Returns the installed path.
fn install_executable(global: &Path) -> Result<PathBuf> {
    let current = std::env::current_exe().context("failed to locate the running executable")?;
    let dist = global.join("dist");
    let target = dist.join(format!("agc{}", std::env::consts::EXE_SUFFIX));

    if same_path(&current, &target) {
        tracing::debug!(path = %target.display(), "executable already installed");
        return Ok(target);
    }

    println!("Copying executable to {}...", dist.display());
    remove_path(&dist)?;
    fs::create_dir_all(&dist).with_context(|| format!("failed to create {}", dist.display()))?;
    fs::copy(&current, &target)
        .with_context(|| format!("failed to copy executable to {}", target.display()))?;
    Ok(target)
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
