use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AgcelError;
use crate::store::frontmatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Symlink the destination to the source; edits to the source show up live.
    Link,
    /// Snapshot the source into the destination.
    Copy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// A real directory sits where a link should go.
    Directory(PathBuf),
    /// A file whose content differs from the incoming one.
    File(PathBuf),
}

impl Conflict {
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::File(path) => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Overwrite,
    Skip,
    OverwriteAll,
    SkipAll,
}

/// Answers conflicts. The CLI prompts on stdin; tests script the answers.
pub trait Resolver {
    fn resolve(&mut self, conflict: &Conflict) -> std::io::Result<Decision>;
}

/// Resolves every conflict the same way.
pub struct Always(pub Decision);

impl Resolver for Always {
    fn resolve(&mut self, _conflict: &Conflict) -> std::io::Result<Decision> {
        Ok(self.0)
    }
}

/// Remembers "all" answers so the resolver is asked at most once after one.
pub struct ConflictPolicy<'a> {
    resolver: &'a mut dyn Resolver,
    sticky: Option<bool>,
}

impl<'a> ConflictPolicy<'a> {
    pub fn new(resolver: &'a mut dyn Resolver) -> Self {
        Self {
            resolver,
            sticky: None,
        }
    }

    pub fn overwrite(&mut self, conflict: &Conflict) -> Result<bool, AgcelError> {
        if let Some(all) = self.sticky {
            return Ok(all);
        }
        let decision = self.resolver.resolve(conflict).map_err(AgcelError::Prompt)?;
        Ok(match decision {
            Decision::Overwrite => true,
            Decision::Skip => false,
            Decision::OverwriteAll => {
                self.sticky = Some(true);
                true
            }
            Decision::SkipAll => {
                self.sticky = Some(false);
                false
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl SyncFailure {
    fn new(path: &Path, err: impl std::fmt::Display) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CopyReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failures: Vec<SyncFailure>,
}

#[derive(Debug)]
pub enum SyncOutcome {
    SourceMissing,
    Linked,
    AlreadyLinked,
    Skipped,
    Copied(CopyReport),
    Failed(SyncFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    New,
    Unchanged,
    Differs,
}

#[derive(Debug)]
pub struct PlannedFile {
    pub dest: PathBuf,
    pub content: Vec<u8>,
    pub status: FileStatus,
}

/// What a copy would do, computed without touching the destination.
#[derive(Debug, Default)]
pub struct CopyPlan {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<PlannedFile>,
    pub failures: Vec<SyncFailure>,
}

/// Bring `dest` in line with `source`. Filesystem errors are reported in the
/// outcome rather than returned; only a failed prompt aborts the sync.
pub fn sync_dir(
    source: &Path,
    dest: &Path,
    mode: SyncMode,
    policy: &mut ConflictPolicy<'_>,
) -> Result<SyncOutcome, AgcelError> {
    if !source.is_dir() {
        tracing::warn!(source = %source.display(), "sync source missing");
        return Ok(SyncOutcome::SourceMissing);
    }

    match mode {
        SyncMode::Link => link(source, dest, policy),
        SyncMode::Copy => copy(source, dest, policy),
    }
}

fn link(
    source: &Path,
    dest: &Path,
    policy: &mut ConflictPolicy<'_>,
) -> Result<SyncOutcome, AgcelError> {
    let source = source.canonicalize().unwrap_or_else(|_| source.to_path_buf());

    match fs::symlink_metadata(dest) {
        Ok(meta) if meta.file_type().is_symlink() => {
            if points_to(dest, &source) {
                return Ok(SyncOutcome::AlreadyLinked);
            }
            tracing::debug!(dest = %dest.display(), "replacing stale link");
            if let Err(e) = remove_link(dest) {
                return Ok(SyncOutcome::Failed(SyncFailure::new(dest, e)));
            }
        }
        Ok(meta) => {
            if !policy.overwrite(&Conflict::Directory(dest.to_path_buf()))? {
                return Ok(SyncOutcome::Skipped);
            }
            let removed = if meta.is_dir() {
                fs::remove_dir_all(dest)
            } else {
                fs::remove_file(dest)
            };
            if let Err(e) = removed {
                return Ok(SyncOutcome::Failed(SyncFailure::new(dest, e)));
            }
        }
        Err(_) => {}
    }

    if let Some(parent) = dest.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            return Ok(SyncOutcome::Failed(SyncFailure::new(parent, e)));
        }
    }

    match symlink_dir(&source, dest) {
        Ok(()) => Ok(SyncOutcome::Linked),
        Err(e) => Ok(SyncOutcome::Failed(SyncFailure::new(dest, e))),
    }
}

fn copy(
    source: &Path,
    dest: &Path,
    policy: &mut ConflictPolicy<'_>,
) -> Result<SyncOutcome, AgcelError> {
    if is_symlink(dest) {
        tracing::debug!(dest = %dest.display(), "replacing link with a copy");
        if let Err(e) = remove_link(dest) {
            return Ok(SyncOutcome::Failed(SyncFailure::new(dest, e)));
        }
    }

    let plan = plan_copy(source, dest);
    let mut report = CopyReport {
        failures: plan.failures,
        ..Default::default()
    };

    for dir in &plan.dirs {
        if let Err(e) = fs::create_dir_all(dir) {
            report.failures.push(SyncFailure::new(dir, e));
        }
    }

    for file in plan.files {
        match file.status {
            FileStatus::Unchanged => report.unchanged += 1,
            FileStatus::New => match write_file(&file) {
                Ok(()) => report.created += 1,
                Err(e) => report.failures.push(SyncFailure::new(&file.dest, e)),
            },
            FileStatus::Differs => {
                if !policy.overwrite(&Conflict::File(file.dest.clone()))? {
                    report.skipped += 1;
                    continue;
                }
                match write_file(&file) {
                    Ok(()) => report.updated += 1,
                    Err(e) => report.failures.push(SyncFailure::new(&file.dest, e)),
                }
            }
        }
    }

    Ok(SyncOutcome::Copied(report))
}

/// Compute the destination content of every file under `source` (markdown
/// gets a title) and compare it against what is already at `dest`.
pub fn plan_copy(source: &Path, dest: &Path) -> CopyPlan {
    let mut plan = CopyPlan {
        dirs: vec![dest.to_path_buf()],
        ..Default::default()
    };

    for entry in walkdir::WalkDir::new(source).min_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(source).to_path_buf();
                plan.failures.push(SyncFailure::new(&path, e));
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            plan.dirs.push(target);
            continue;
        }

        let content = match fs::read(entry.path()) {
            Ok(bytes) => decorate(entry.path(), bytes),
            Err(e) => {
                plan.failures.push(SyncFailure::new(entry.path(), e));
                continue;
            }
        };

        let status = if target.is_dir() {
            FileStatus::Differs
        } else {
            match fs::read(&target) {
                Ok(existing) if existing == content => FileStatus::Unchanged,
                Ok(_) => FileStatus::Differs,
                Err(_) => FileStatus::New,
            }
        };

        plan.files.push(PlannedFile {
            dest: target,
            content,
            status,
        });
    }

    plan
}

fn decorate(path: &Path, bytes: Vec<u8>) -> Vec<u8> {
    let Some(title) = frontmatter::title_for(path) else {
        return bytes;
    };
    match String::from_utf8(bytes) {
        Ok(text) => frontmatter::ensure_title(&text, &title).into_bytes(),
        Err(e) => e.into_bytes(),
    }
}

fn write_file(file: &PlannedFile) -> std::io::Result<()> {
    if file.dest.is_dir() {
        fs::remove_dir_all(&file.dest)?;
    }
    if let Some(parent) = file.dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file.dest, &file.content)
}

/// Verbatim recursive copy.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<(), AgcelError> {
    fs::create_dir_all(dst).map_err(|source| AgcelError::DirCreate {
        path: dst.to_path_buf(),
        source,
    })?;

    for entry in walkdir::WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| AgcelError::FileRead {
            path: src.to_path_buf(),
            source: e.into(),
        })?;

        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|source| AgcelError::DirCreate {
                path: target.clone(),
                source,
            })?;
        } else {
            fs::copy(entry.path(), &target).map_err(|source| AgcelError::FileWrite {
                path: target.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Remove whatever is at `path`: link, file or directory tree.
pub fn remove_path(path: &Path) -> Result<(), AgcelError> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    let removed = if meta.file_type().is_symlink() {
        remove_link(path)
    } else if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|source| AgcelError::Remove {
        path: path.to_path_buf(),
        source,
    })
}

pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

fn points_to(link: &Path, target: &Path) -> bool {
    if fs::read_link(link).is_ok_and(|t| t == target) {
        return true;
    }
    matches!(
        (link.canonicalize(), target.canonicalize()),
        (Ok(a), Ok(b)) if a == b
    )
}

#[cfg(unix)]
pub fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
pub fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(unix)]
fn remove_link(path: &Path) -> std::io::Result<()> {
    fs::remove_file(path)
}

#[cfg(windows)]
fn remove_link(path: &Path) -> std::io::Result<()> {
    fs::remove_dir(path).or_else(|_| fs::remove_file(path))
}
