use std::fs;
use std::path::Path;

use crate::model::{SKILL_FILE, Skill, Workflow};

/// Skills directly under `dir`, sorted by name. A missing directory is empty.
pub fn skills(dir: &Path) -> Vec<Skill> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut skills: Vec<Skill> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if !path.is_dir() || !path.join(SKILL_FILE).is_file() {
                return None;
            }
            let name = entry.file_name().into_string().ok()?;
            Some(Skill { name, path })
        })
        .collect();
    skills.sort_by(|a, b| a.name.cmp(&b.name));
    skills
}

pub fn find_skill(dir: &Path, name: &str) -> Option<Skill> {
    skills(dir).into_iter().find(|s| s.name == name)
}

/// Markdown files directly under `dir`, sorted by name.
pub fn workflows(dir: &Path) -> Vec<Workflow> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut workflows: Vec<Workflow> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "md") {
                return None;
            }
            let name = path.file_stem()?.to_str()?.to_string();
            Some(Workflow { name, path })
        })
        .collect();
    workflows.sort_by(|a, b| a.name.cmp(&b.name));
    workflows
}
