use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod error;
mod mcp;
mod model;
mod process;
mod store;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // stdout carries JSON-RPC for `serve --mode stdio`; logs always go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if cli.verbose { "agc=debug" } else { "agc=info" })
        }))
        .init();

    let global_dir = cli.global_dir.as_deref();
    let mcp_config = cli.mcp_config.as_deref();

    match cli.command {
        cli::Command::Init { path, link, yes } => cli::init::run(global_dir, path, link, yes),
        cli::Command::Install { package_root } => {
            cli::install::run(global_dir, mcp_config, package_root)
        }
        cli::Command::Uninstall => cli::uninstall::run(global_dir, mcp_config),
        cli::Command::Start => cli::start::run(global_dir),
        cli::Command::Stop => cli::stop::run(global_dir),
        cli::Command::Restart => cli::restart::run(global_dir),
        cli::Command::Status => cli::status::run(global_dir),
        cli::Command::Skills(cli::SkillsSubcommand::List) => cli::list::run_skills(global_dir),
        cli::Command::Workflows(cli::WorkflowsSubcommand::List) => {
            cli::list::run_workflows(global_dir)
        }
        cli::Command::Serve { mode, port, root } => {
            cli::serve::run(global_dir, mode, port, root).await
        }
        cli::Command::Config(cmd) => cli::config::run(global_dir, cmd),
    }
}
