use std::path::{Path, PathBuf};

use crate::error::AgcelError;

const SKILLS: &str = "skills";
const WORKFLOW_DIRS: [&str; 2] = ["workflows", ".agent/workflows"];

/// The directory holding the bundled `skills/` and `workflows/`: the
/// explicit path when given, else the nearest ancestor of the running
/// executable that contains `skills/`.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf, AgcelError> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    let exe = std::env::current_exe().map_err(|_| AgcelError::PackageRootNotFound)?;
    find_root(&exe).ok_or(AgcelError::PackageRootNotFound)
}

fn find_root(exe: &Path) -> Option<PathBuf> {
    exe.ancestors()
        .skip(1)
        .find(|dir| dir.join(SKILLS).is_dir())
        .map(Path::to_path_buf)
}

pub fn skills_source(root: &Path) -> Option<PathBuf> {
    let dir = root.join(SKILLS);
    dir.is_dir().then_some(dir)
}

pub fn workflows_source(root: &Path) -> Option<PathBuf> {
    WORKFLOW_DIRS
        .iter()
        .map(|dir| root.join(dir))
        .find(|dir| dir.is_dir())
}
