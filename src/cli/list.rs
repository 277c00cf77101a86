use std::path::Path;

use anyhow::Result;

use crate::store::catalog;
use crate::store::{Location, LocationKind};

pub fn run_skills(global_dir: Option<&Path>) -> Result<()> {
    let (_, location) = super::current_location(global_dir)?;
    let skills = catalog::skills(&location.skills_dir());
    print_source(&location);

    if skills.is_empty() {
        println!("No skills found.");
        return Ok(());
    }

    println!("Available skills:");
    for skill in skills {
        println!("  - {}", skill.name);
    }
    Ok(())
}

pub fn run_workflows(global_dir: Option<&Path>) -> Result<()> {
    let (_, location) = super::current_location(global_dir)?;
    let workflows = catalog::workflows(&location.workflows_dir());
    print_source(&location);

    if workflows.is_empty() {
        println!("No workflows found.");
        return Ok(());
    }

    println!("Available workflows:");
    for workflow in workflows {
        println!("  - {}", workflow.name);
    }
    Ok(())
}

fn print_source(location: &Location) {
    if location.kind() == LocationKind::Global {
        println!("(using global install at {})", location.root().display());
    }
}
