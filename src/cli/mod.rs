pub mod config;
pub mod init;
pub mod install;
pub mod list;
pub mod prompt;
pub mod restart;
pub mod serve;
pub mod start;
pub mod status;
pub mod stop;
pub mod uninstall;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::mcp::Transport;
use crate::store::Location;
use crate::store::location::default_global_dir;
use crate::store::registry::default_host_config_path;

#[derive(Debug, Parser)]
#[command(
    name = "agc",
    about = "AgCel skills and workflows for coding agents, served over MCP",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Override the global install directory (default: ~/.agcel)
    #[arg(long, env = "AGCEL_GLOBAL_DIR", global = true)]
    pub global_dir: Option<PathBuf>,

    /// Override the host MCP config file (default: ~/.gemini/antigravity/mcp_config.json)
    #[arg(long, env = "AGCEL_MCP_CONFIG", global = true)]
    pub mcp_config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize AgCel in the current project from the global install
    Init {
        /// Path to initialize (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Symlink skills and workflows instead of copying them
        #[arg(long)]
        link: bool,

        /// Overwrite conflicting files without prompting
        #[arg(short, long)]
        yes: bool,
    },

    /// Install AgCel into the global directory and register the MCP server
    Install {
        /// Directory holding the bundled skills/ and workflows/
        #[arg(long, env = "AGCEL_PACKAGE_ROOT")]
        package_root: Option<PathBuf>,
    },

    /// Remove the global install and the MCP server registration
    Uninstall,

    /// Start the MCP server in the background (SSE transport)
    Start,

    /// Stop the background MCP server
    Stop,

    /// Restart the background MCP server
    Restart,

    /// Show whether the background MCP server is running
    Status,

    /// Inspect skills
    #[command(subcommand)]
    Skills(SkillsSubcommand),

    /// Inspect workflows
    #[command(subcommand)]
    Workflows(WorkflowsSubcommand),

    /// Run the MCP server in the foreground
    Serve {
        /// Transport to serve on
        #[arg(long, value_enum, default_value_t = Transport::Stdio)]
        mode: Transport,

        /// Port for the SSE transport (default: port from config.json, then 3000)
        #[arg(long)]
        port: Option<u16>,

        /// AgCel directory to serve from (default: ./.agc, then the global directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Manage the current location's config.json
    #[command(subcommand)]
    Config(ConfigSubcommand),
}

#[derive(Debug, Subcommand)]
pub enum SkillsSubcommand {
    /// List available skills
    List,
}

#[derive(Debug, Subcommand)]
pub enum WorkflowsSubcommand {
    /// List available workflows
    List,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (port, skills_dir, workflows_dir)
        key: String,
        /// Configuration value
        value: String,
    },

    /// Get a specific configuration value
    Get {
        /// Configuration key
        key: String,
    },
}

pub(crate) fn global_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    match override_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(default_global_dir()?),
    }
}

pub(crate) fn host_config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(default_host_config_path()?),
    }
}

pub(crate) fn project_dir() -> Result<PathBuf> {
    std::env::current_dir().context("failed to determine current directory")
}

/// The project location in the working directory, else the global one.
pub(crate) fn current_location(global_override: Option<&Path>) -> Result<(PathBuf, Location)> {
    let project = project_dir()?;
    let global = global_dir(global_override)?;
    let location = Location::resolve(&project, &global)?;
    Ok((project, location))
}
