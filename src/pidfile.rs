//! # PID File
//!
//! Single-instance enforcement through a PID file. A second instance
//! refuses to start while the file names a live process; files left behind
//! by a dead process are reclaimed.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{JsmonError, Result};

/// Guard for an acquired PID file
///
/// Remove it explicitly with [`PidFile::release`] as the last cleanup
/// action; dropping the guard removes the file best-effort as a fallback.
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    armed: bool,
}

impl PidFile {
    /// Create the PID file, refusing to start over a live instance
    ///
    /// # Errors
    ///
    /// - `AlreadyRunning`: the file names a process that is still alive
    /// - `Io`: the file could not be written
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(pid) = read_pid(path) {
            if process_alive(pid) {
                return Err(JsmonError::AlreadyRunning(pid));
            }
            warn!("removing stale PID file {} (pid {} is gone)", path.display(), pid);
            fs::remove_file(path)?;
        } else if path.exists() {
            warn!("removing unreadable PID file {}", path.display());
            fs::remove_file(path)?;
        }

        fs::write(path, format!("{}\n", std::process::id()))?;
        debug!("created PID file {}", path.display());

        Ok(Self { path: path.to_path_buf(), armed: true })
    }

    /// Remove the PID file
    pub fn release(mut self) -> Result<()> {
        self.armed = false;
        fs::remove_file(&self.path)?;
        Ok(())
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("failed to remove PID file {}: {}", self.path.display(), e);
            }
        }
    }
}

fn read_pid(path: &Path) -> Option<i32> {
    let contents = fs::read_to_string(path).ok()?;
    contents.trim().parse().ok()
}

/// Probe for process existence with signal 0
fn process_alive(pid: i32) -> bool {
    if pid <= 0 {
        return false;
    }
    // SAFETY: signal 0 performs error checking only, nothing is delivered.
    let rc = unsafe { libc::kill(pid, 0) };
    // EPERM still means the process exists, just not ours to signal
    rc == 0 || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}
