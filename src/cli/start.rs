use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::process::{Lifecycle, PidFile, SpawnSpec, StartOutcome, SystemProcess};
use crate::store::{Location, LocationKind};

pub fn run(global_dir: Option<&Path>) -> Result<()> {
    let (project_dir, location) = super::current_location(global_dir)?;
    let lifecycle = lifecycle(&location);
    let spec = spawn_spec(&project_dir, &location)?;

    let outcome = lifecycle.start(&spec).context("failed to start MCP server")?;
    print_started(&location, outcome);
    Ok(())
}

pub(super) fn lifecycle(location: &Location) -> Lifecycle<SystemProcess> {
    Lifecycle::new(PidFile::new(location.pid_path()), SystemProcess)
}

/// Re-run this executable as `serve --mode sse` rooted at `location`.
pub(super) fn spawn_spec(project_dir: &Path, location: &Location) -> Result<SpawnSpec> {
    let program = std::env::current_exe().context("failed to locate the running executable")?;
    Ok(SpawnSpec {
        program,
        args: vec![
            "serve".to_string(),
            "--mode".to_string(),
            "sse".to_string(),
            "--root".to_string(),
            location.root().display().to_string(),
        ],
        cwd: PathBuf::from(project_dir),
        log_path: location.log_path(),
    })
}

pub(super) fn print_started(location: &Location, outcome: StartOutcome) {
    match outcome {
        StartOutcome::AlreadyRunning(pid) => {
            println!("AgCel MCP server is already running (PID: {pid})");
        }
        StartOutcome::Started(pid) => {
            if location.kind() == LocationKind::Global {
                println!("AgCel is not initialized in this project. Using the global install.");
            }
            println!("AgCel MCP server started (PID: {pid})");
            println!(
                "  endpoint: http://localhost:{}/sse",
                location.config().port
            );
            println!("  logs: {}", location.log_path().display());
        }
    }
}
