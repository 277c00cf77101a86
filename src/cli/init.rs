use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::prompt::StdinPrompt;
use crate::error::AgcelError;
use crate::store::project::{self, AgentLink};
use crate::store::sync::{
    Always, ConflictPolicy, Decision, Resolver, SyncMode, SyncOutcome, sync_dir,
};
use crate::store::{Location, LocationKind};

pub fn run(global_dir: Option<&Path>, path: Option<PathBuf>, link: bool, yes: bool) -> Result<()> {
    let project_dir = match path {
        Some(path) => path,
        None => super::project_dir()?,
    };
    let global_root = super::global_dir(global_dir)?;
    if !global_root.is_dir() {
        return Err(AgcelError::GlobalInstallMissing(global_root).into());
    }
    let global = Location::open(global_root, LocationKind::Global);

    println!("Initializing AgCel in {}...", project_dir.display());
    let (location, created) =
        Location::init_project(&project_dir).context("failed to initialize project")?;
    if !created {
        println!("AgCel directory already exists. Updating resources...");
    }

    let mode = if link { SyncMode::Link } else { SyncMode::Copy };
    let mut prompt = StdinPrompt;
    let mut always = Always(Decision::OverwriteAll);
    let resolver: &mut dyn Resolver = if yes { &mut always } else { &mut prompt };
    let mut policy = ConflictPolicy::new(resolver);

    let skills = sync_dir(&global.skills_dir(), &location.skills_dir(), mode, &mut policy)
        .context("failed to sync skills")?;
    report("skills", &location.skills_dir(), skills);

    let workflows = sync_dir(
        &global.workflows_dir(),
        &location.workflows_dir(),
        mode,
        &mut policy,
    )
    .context("failed to sync workflows")?;
    report("workflows", &location.workflows_dir(), workflows);

    if location.workflows_dir().is_dir() {
        match project::link_agent_workflows(&project_dir, &location.workflows_dir()) {
            Ok(AgentLink::Linked(link)) => println!("  linked {}", link.display()),
            Ok(AgentLink::AlreadyLinked(_)) => {}
            Ok(AgentLink::Occupied(link)) => {
                println!("  {} already exists, left as is", link.display())
            }
            Err(e) => eprintln!("warning: failed to link agent workflows: {e}"),
        }
    }

    let added = project::append_gitignore(&project_dir, &project::ignored_entries())
        .context("failed to update .gitignore")?;
    for entry in added {
        println!("  {entry} added to .gitignore");
    }

    println!("Successfully initialized AgCel in {}", location.root().display());
    println!("Run `agc start` to start the local MCP server.");
    Ok(())
}

fn report(label: &str, dest: &Path, outcome: SyncOutcome) {
    match outcome {
        SyncOutcome::SourceMissing => {
            eprintln!("warning: no {label} in the global install, skipping")
        }
        SyncOutcome::Linked => println!("  {label}: linked {}", dest.display()),
        SyncOutcome::AlreadyLinked => println!("  {label}: already linked"),
        SyncOutcome::Skipped => println!("  {label}: kept existing {}", dest.display()),
        SyncOutcome::Copied(copied) => {
            println!(
                "  {label}: {} added, {} updated, {} unchanged, {} kept",
                copied.created, copied.updated, copied.unchanged, copied.skipped
            );
            for failure in copied.failures {
                eprintln!(
                    "warning: failed to sync {}: {}",
                    failure.path.display(),
                    failure.reason
                );
            }
        }
        SyncOutcome::Failed(failure) => eprintln!(
            "warning: failed to sync {label} at {}: {}",
            failure.path.display(),
            failure.reason
        ),
    }
}
