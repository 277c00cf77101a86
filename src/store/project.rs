use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AgcelError;
use crate::store::location::PROJECT_DIR;
use crate::store::sync::{is_symlink, symlink_dir};

const AGENT_WORKFLOWS: &str = ".agent/workflows";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentLink {
    Linked(PathBuf),
    AlreadyLinked(PathBuf),
    /// Something other than our link is already there; left untouched.
    Occupied(PathBuf),
}

/// Entries `init` keeps out of version control.
pub fn ignored_entries() -> [String; 2] {
    [format!("{PROJECT_DIR}/"), AGENT_WORKFLOWS.to_string()]
}

/// Point `<project>/.agent/workflows` at `workflows_dir` when nothing is there yet.
pub fn link_agent_workflows(
    project_dir: &Path,
    workflows_dir: &Path,
) -> Result<AgentLink, AgcelError> {
    let link = project_dir.join(AGENT_WORKFLOWS);
    let target = workflows_dir
        .canonicalize()
        .unwrap_or_else(|_| workflows_dir.to_path_buf());

    if is_symlink(&link) {
        let current = link.canonicalize().ok();
        if current.as_deref() == Some(target.as_path()) {
            return Ok(AgentLink::AlreadyLinked(link));
        }
        return Ok(AgentLink::Occupied(link));
    }
    if link.exists() {
        return Ok(AgentLink::Occupied(link));
    }

    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent).map_err(|source| AgcelError::DirCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    symlink_dir(&target, &link).map_err(|source| AgcelError::Symlink {
        link: link.clone(),
        target,
        source,
    })?;
    Ok(AgentLink::Linked(link))
}

/// Append each missing entry to `<project>/.gitignore`. Returns the entries added.
pub fn append_gitignore(project_dir: &Path, entries: &[String]) -> Result<Vec<String>, AgcelError> {
    let gitignore_path = project_dir.join(".gitignore");

    let content = if gitignore_path.exists() {
        fs::read_to_string(&gitignore_path).map_err(|source| AgcelError::FileRead {
            path: gitignore_path.clone(),
            source,
        })?
    } else {
        String::new()
    };

    let missing: Vec<String> = entries
        .iter()
        .filter(|entry| !content.lines().any(|l| l.trim() == entry.as_str()))
        .cloned()
        .collect();
    if missing.is_empty() {
        return Ok(missing);
    }

    let mut updated = content;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    for entry in &missing {
        updated.push_str(entry);
        updated.push('\n');
    }
    fs::write(&gitignore_path, updated).map_err(|source| AgcelError::FileWrite {
        path: gitignore_path,
        source,
    })?;
    Ok(missing)
}
