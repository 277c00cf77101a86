use std::path::Path;

use anyhow::Result;

use crate::error::AgcelError;
use crate::store::HostConfig;
use crate::store::registry::SERVER_NAME;
use crate::store::sync::remove_path;

/// Best effort: each step reports its own failure and the next one still runs.
pub fn run(global_dir: Option<&Path>, mcp_config: Option<&Path>) -> Result<()> {
    println!("Uninstalling AgCel...");

    let host = HostConfig::new(super::host_config_path(mcp_config)?);
    if !host.exists() {
        println!("MCP config not found at {}", host.path().display());
    } else {
        match host.remove(SERVER_NAME) {
            Ok(true) => println!("Removed AgCel from {}", host.path().display()),
            Ok(false) => println!("AgCel not found in MCP config."),
            Err(e) => eprintln!("warning: failed to update MCP config: {e}"),
        }
    }

    let global = super::global_dir(global_dir)?;
    if !global.exists() {
        println!("Global directory not found.");
    } else {
        match remove_path(&global) {
            Ok(()) => println!("Removed global directory at {}", global.display()),
            Err(AgcelError::Remove { path, source })
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                eprintln!(
                    "error: permission denied removing {}. You might need elevated privileges.",
                    path.display()
                )
            }
            Err(e) => eprintln!("warning: failed to remove global directory: {e}"),
        }
    }

    println!("AgCel uninstallation complete.");
    Ok(())
}
