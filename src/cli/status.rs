use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::model::InstallRecord;
use crate::process::ServerState;

pub fn run(global_dir: Option<&Path>) -> Result<()> {
    let (_, location) = super::current_location(global_dir)?;
    let lifecycle = super::start::lifecycle(&location);
    let state = lifecycle.state().context("failed to read PID file")?;

    match state {
        ServerState::Running(pid) => {
            println!("AgCel MCP server is running (PID: {pid})");
            if let Some(started) = started_at(lifecycle.pid_file().path()) {
                println!("  started: {}", started.format("%Y-%m-%d %H:%M:%S"));
            }
            println!("  endpoint: http://localhost:{}/sse", location.config().port);
        }
        ServerState::Stopped => println!("AgCel MCP server is stopped."),
        ServerState::Stale(pid) => {
            println!("AgCel MCP server is stopped (PID file exists but process is not running).");
            match pid {
                Some(pid) => println!("  stale PID: {pid}"),
                None => println!("  PID file is unreadable"),
            }
            println!("  run `agc stop` to clean up or `agc start` to start again");
        }
    }

    println!("  location: {} ({})", location.root().display(), location.kind());
    println!("  port: {}", location.config().port);

    let global = super::global_dir(global_dir)?;
    if let Some(record) = install_record(&global.join("install.json")) {
        println!(
            "  global install: {} (version {})",
            global.display(),
            record.version
        );
    }
    Ok(())
}

fn started_at(pid_path: &Path) -> Option<DateTime<Local>> {
    let modified = fs::metadata(pid_path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Local>::from(modified))
}

fn install_record(path: &Path) -> Option<InstallRecord> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "ignoring unreadable install record");
            None
        }
    }
}
