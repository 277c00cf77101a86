//! Background server lifecycle tracked through a PID file.
//!
//! The state machine is pure; spawning and signalling go through
//! [`ProcessControl`] so the transitions can be exercised without real
//! processes.

pub mod system;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AgcelError;

pub use system::SystemProcess;

/// What the PID file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PidRecord {
    Missing,
    Pid(u32),
    Corrupt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Running(u32),
    /// PID file present but the process is gone.
    Stale(Option<u32>),
}

impl ServerState {
    pub fn observe(record: PidRecord, is_alive: impl Fn(u32) -> bool) -> Self {
        match record {
            PidRecord::Missing => Self::Stopped,
            PidRecord::Corrupt => Self::Stale(None),
            PidRecord::Pid(pid) if is_alive(pid) => Self::Running(pid),
            PidRecord::Pid(pid) => Self::Stale(Some(pid)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPlan {
    AlreadyRunning(u32),
    Spawn { clear_stale: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPlan {
    NotRunning,
    Terminate(u32),
    ClearStale,
}

pub fn plan_start(state: ServerState) -> StartPlan {
    match state {
        ServerState::Running(pid) => StartPlan::AlreadyRunning(pid),
        ServerState::Stopped => StartPlan::Spawn { clear_stale: false },
        ServerState::Stale(_) => StartPlan::Spawn { clear_stale: true },
    }
}

pub fn plan_stop(state: ServerState) -> StopPlan {
    match state {
        ServerState::Running(pid) => StopPlan::Terminate(pid),
        ServerState::Stopped => StopPlan::NotRunning,
        ServerState::Stale(_) => StopPlan::ClearStale,
    }
}

/// How to launch the detached server.
#[derive(Debug, Clone)]
pub struct SpawnSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub log_path: PathBuf,
}

pub trait ProcessControl {
    /// Start the process detached with output appended to the log; return its PID.
    fn spawn_detached(&self, spec: &SpawnSpec) -> Result<u32, AgcelError>;
    fn is_alive(&self, pid: u32) -> bool;
    fn terminate(&self, pid: u32) -> Result<(), AgcelError>;
}

pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<PidRecord, AgcelError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content
                .trim()
                .parse::<u32>()
                .map(PidRecord::Pid)
                .unwrap_or(PidRecord::Corrupt)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PidRecord::Missing),
            Err(source) => Err(AgcelError::FileRead {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn write(&self, pid: u32) -> Result<(), AgcelError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| AgcelError::DirCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, format!("{pid}\n")).map_err(|source| AgcelError::FileWrite {
            path: self.path.clone(),
            source,
        })
    }

    pub fn remove(&self) -> Result<(), AgcelError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(AgcelError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    AlreadyRunning(u32),
    Started(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    NotRunning,
    Stopped(u32),
    ClearedStale,
}

pub struct Lifecycle<P: ProcessControl> {
    pid_file: PidFile,
    control: P,
}

impl<P: ProcessControl> Lifecycle<P> {
    pub fn new(pid_file: PidFile, control: P) -> Self {
        Self { pid_file, control }
    }

    pub fn pid_file(&self) -> &PidFile {
        &self.pid_file
    }

    pub fn state(&self) -> Result<ServerState, AgcelError> {
        let record = self.pid_file.read()?;
        Ok(ServerState::observe(record, |pid| self.control.is_alive(pid)))
    }

    /// Fire-and-forget: returns once the process is spawned and recorded,
    /// without waiting for the server to become ready.
    pub fn start(&self, spec: &SpawnSpec) -> Result<StartOutcome, AgcelError> {
        match plan_start(self.state()?) {
            StartPlan::AlreadyRunning(pid) => Ok(StartOutcome::AlreadyRunning(pid)),
            StartPlan::Spawn { clear_stale } => {
                if clear_stale {
                    self.pid_file.remove()?;
                }
                let pid = self.control.spawn_detached(spec)?;
                self.pid_file.write(pid)?;
                tracing::debug!(pid, "server spawned");
                Ok(StartOutcome::Started(pid))
            }
        }
    }

    pub fn stop(&self) -> Result<StopOutcome, AgcelError> {
        match plan_stop(self.state()?) {
            StopPlan::NotRunning => Ok(StopOutcome::NotRunning),
            StopPlan::Terminate(pid) => {
                self.control.terminate(pid)?;
                self.pid_file.remove()?;
                Ok(StopOutcome::Stopped(pid))
            }
            StopPlan::ClearStale => {
                self.pid_file.remove()?;
                Ok(StopOutcome::ClearedStale)
            }
        }
    }

    pub fn restart(&self, spec: &SpawnSpec) -> Result<(StopOutcome, StartOutcome), AgcelError> {
        let stopped = self.stop()?;
        let started = self.start(spec)?;
        Ok((stopped, started))
    }
}
