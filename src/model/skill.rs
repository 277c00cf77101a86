use std::path::PathBuf;

pub const SKILL_FILE: &str = "SKILL.md";

/// A directory holding a `SKILL.md`, named after the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub name: String,
    pub path: PathBuf,
}

impl Skill {
    pub fn document(&self) -> PathBuf {
        self.path.join(SKILL_FILE)
    }
}

/// A markdown workflow template, named after its file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub name: String,
    pub path: PathBuf,
}
