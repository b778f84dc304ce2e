//! Single-instance lock for the daemon
//!
//! The lock file holds an exclusive `flock` for the daemon's lifetime and
//! records who holds it, which is what `status` and `stop` read.

use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::fcntl::{flock, FlockArg};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

/// Held for as long as the daemon runs; the file is removed on release or drop
pub struct DaemonLock {
    path: PathBuf,
    // Keeps the flock alive
    _file: File,
}

/// What the lock file records about its holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockContent {
    pub pid: u32,
    /// Unix time in milliseconds
    pub started_at: u64,
}

impl LockContent {
    fn current() -> Self {
        Self {
            pid: std::process::id(),
            started_at: current_timestamp_ms(),
        }
    }
}

impl DaemonLock {
    /// Take the lock
    ///
    /// A held flock always means a live daemon, whatever the file says. Once
    /// the flock is ours, leftover content from a dead holder is overwritten.
    pub fn acquire(lock_path: &Path) -> Result<Self> {
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory {}", parent.display())
            })?;
        }

        for _ in 0..3 {
            let mut file = open_lock_file(lock_path)?;

            if !try_flock_exclusive(&file)? {
                match read_content(&mut file) {
                    Ok(holder) => anyhow::bail!("Daemon already running (pid {})", holder.pid),
                    // Holder has not written its pid yet
                    Err(_) => anyhow::bail!("Daemon already running"),
                }
            }

            // A releasing holder may have unlinked the path after we opened it
            if !is_same_file(&file, lock_path) {
                continue;
            }

            write_content(&mut file, &LockContent::current())?;
            return Ok(Self {
                path: lock_path.to_path_buf(),
                _file: file,
            });
        }

        anyhow::bail!("Could not take lock {}", lock_path.display())
    }

    /// Drop the lock and delete the lock file
    pub fn release(self) -> Result<()> {
        std::fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove lock file {}", self.path.display()))
    }

    /// Content of the lock file if the recorded process is still alive
    pub fn holder(lock_path: &Path) -> Option<LockContent> {
        let mut file = File::open(lock_path).ok()?;
        let content = read_content(&mut file).ok()?;
        is_process_alive(content.pid).then_some(content)
    }
}

impl Drop for DaemonLock {
    fn drop(&mut self) {
        // Already gone after release()
        let _ = std::fs::remove_file(&self.path);
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to open lock file {}", path.display()))
}

fn is_same_file(file: &File, path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (file.metadata(), std::fs::metadata(path)) {
        (Ok(held), Ok(on_disk)) => held.dev() == on_disk.dev() && held.ino() == on_disk.ino(),
        _ => false,
    }
}

fn try_flock_exclusive(file: &File) -> Result<bool> {
    match flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock) {
        Ok(()) => Ok(true),
        Err(Errno::EWOULDBLOCK) => Ok(false),
        Err(e) => Err(e).context("flock failed"),
    }
}

fn write_content(file: &mut File, content: &LockContent) -> Result<()> {
    let serialized = serde_json::to_string(content).context("Failed to serialize lock content")?;
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(serialized.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn read_content(file: &mut File) -> Result<LockContent> {
    file.seek(SeekFrom::Start(0))?;
    let mut raw = String::new();
    file.read_to_string(&mut raw)?;
    serde_json::from_str(&raw).context("Malformed lock file")
}

/// Whether `pid` names a live process
pub fn is_process_alive(pid: u32) -> bool {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };

    // Null signal: existence check only. EPERM still means it exists.
    !matches!(kill(Pid::from_raw(raw), None::<Signal>), Err(Errno::ESRCH))
}

fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
