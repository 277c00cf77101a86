use std::path::Path;

use anyhow::{Context, Result};

pub fn run(global_dir: Option<&Path>) -> Result<()> {
    let (project_dir, location) = super::current_location(global_dir)?;
    let lifecycle = super::start::lifecycle(&location);
    let spec = super::start::spawn_spec(&project_dir, &location)?;

    println!("Restarting AgCel MCP server...");
    let (stopped, started) = lifecycle
        .restart(&spec)
        .context("failed to restart MCP server")?;
    super::stop::print_stopped(stopped);
    super::start::print_started(&location, started);
    Ok(())
}
