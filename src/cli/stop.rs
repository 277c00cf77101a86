use std::path::Path;

use anyhow::{Context, Result};

use crate::process::StopOutcome;

pub fn run(global_dir: Option<&Path>) -> Result<()> {
    let (_, location) = super::current_location(global_dir)?;
    let outcome = super::start::lifecycle(&location)
        .stop()
        .context("failed to stop MCP server")?;
    print_stopped(outcome);
    Ok(())
}

pub(super) fn print_stopped(outcome: StopOutcome) {
    match outcome {
        StopOutcome::NotRunning => println!("AgCel MCP server is not running."),
        StopOutcome::Stopped(pid) => println!("Stopped AgCel MCP server (PID: {pid})"),
        StopOutcome::ClearedStale => {
            println!("AgCel MCP server was not running; removed stale PID file.")
        }
    }
}
