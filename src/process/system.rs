use std::fs::OpenOptions;
use std::process::{Command, Stdio};

use crate::error::AgcelError;

use super::{ProcessControl, SpawnSpec};

/// Real processes: `std::process` for spawning, `kill(2)` for probing and
/// stopping.
pub struct SystemProcess;

impl ProcessControl for SystemProcess {
    fn spawn_detached(&self, spec: &SpawnSpec) -> Result<u32, AgcelError> {
        if let Some(parent) = spec.log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| AgcelError::DirCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&spec.log_path)
            .map_err(|source| AgcelError::FileWrite {
                path: spec.log_path.clone(),
                source,
            })?;
        let log_err = log.try_clone().map_err(|source| AgcelError::FileWrite {
            path: spec.log_path.clone(),
            source,
        })?;

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .stdout(log)
            .stderr(log_err);

        // Own process group so terminal signals aimed at the CLI skip the server.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd.spawn().map_err(|source| AgcelError::Spawn {
            program: spec.program.clone(),
            source,
        })?;
        Ok(child.id())
    }

    #[cfg(unix)]
    fn is_alive(&self, pid: u32) -> bool {
        let Some(pid) = to_pid(pid) else {
            return false;
        };
        // SAFETY: signal 0 only checks whether the process can be signalled.
        // EPERM counts as not running along with ESRCH.
        unsafe { libc::kill(pid, 0) == 0 }
    }

    #[cfg(not(unix))]
    fn is_alive(&self, _pid: u32) -> bool {
        false
    }

    #[cfg(unix)]
    fn terminate(&self, pid: u32) -> Result<(), AgcelError> {
        let Some(raw) = to_pid(pid) else {
            return Err(AgcelError::Signal {
                pid,
                source: std::io::Error::from(std::io::ErrorKind::InvalidInput),
            });
        };
        // SAFETY: plain kill(2) on a positive PID.
        let ret = unsafe { libc::kill(raw, libc::SIGTERM) };
        if ret == 0 {
            Ok(())
        } else {
            Err(AgcelError::Signal {
                pid,
                source: std::io::Error::last_os_error(),
            })
        }
    }

    #[cfg(not(unix))]
    fn terminate(&self, pid: u32) -> Result<(), AgcelError> {
        Err(AgcelError::Signal {
            pid,
            source: std::io::Error::from(std::io::ErrorKind::Unsupported),
        })
    }
}

/// Zero and values past `pid_t` would address process groups, never a single
/// process.
#[cfg(unix)]
fn to_pid(pid: u32) -> Option<libc::pid_t> {
    libc::pid_t::try_from(pid).ok().filter(|pid| *pid > 0)
}
