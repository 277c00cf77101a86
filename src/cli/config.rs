use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::ConfigSubcommand;

const KEYS: &str = "port, skills_dir, workflows_dir";

pub fn run(global_dir: Option<&Path>, cmd: ConfigSubcommand) -> Result<()> {
    match cmd {
        ConfigSubcommand::Show => run_show(global_dir),
        ConfigSubcommand::Set { key, value } => run_set(global_dir, key, value),
        ConfigSubcommand::Get { key } => run_get(global_dir, key),
    }
}

fn run_show(global_dir: Option<&Path>) -> Result<()> {
    let (_, location) = super::current_location(global_dir)?;

    let config = location.config();
    println!("Location:      {} ({})", location.root().display(), location.kind());
    println!("Port:          {}", config.port);
    println!("Skills dir:    {}", config.skills_dir.display());
    println!("Workflows dir: {}", config.workflows_dir.display());
    Ok(())
}

fn run_set(global_dir: Option<&Path>, key: String, value: String) -> Result<()> {
    let (_, mut location) = super::current_location(global_dir)?;

    let config = location.config_mut();
    match key.as_str() {
        "port" => {
            config.port = value
                .parse::<u16>()
                .with_context(|| format!("invalid port value: {value} (expected 0-65535)"))?;
        }
        "skills_dir" => config.skills_dir = PathBuf::from(&value),
        "workflows_dir" => config.workflows_dir = PathBuf::from(&value),
        _ => anyhow::bail!("unknown config key: {key}\nValid keys: {KEYS}"),
    }

    location.save_config().context("failed to save config")?;
    println!("Set {key} = {value}");
    Ok(())
}

fn run_get(global_dir: Option<&Path>, key: String) -> Result<()> {
    let (_, location) = super::current_location(global_dir)?;

    let config = location.config();
    match key.as_str() {
        "port" => println!("{}", config.port),
        "skills_dir" => println!("{}", config.skills_dir.display()),
        "workflows_dir" => println!("{}", config.workflows_dir.display()),
        _ => anyhow::bail!("unknown config key: {key}\nValid keys: {KEYS}"),
    }
    Ok(())
}
