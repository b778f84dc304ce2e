//! Sandboxed home directory for end-to-end tests

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// A temporary home directory with a config file pointing everything inside it
///
/// Layout:
/// ```text
/// <tmp>/
///   home/            watched root, $HOME for the child
///   run/watchsock    query socket
///   state/           lock file and logs
///   config.toml
/// ```
pub struct TestHome {
    _temp_dir: TempDir,
    pub root: PathBuf,
    pub home: PathBuf,
    pub socket: PathBuf,
    pub state_dir: PathBuf,
    pub config_path: PathBuf,
}

impl TestHome {
    pub fn new(ignore_patterns: &[&str]) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().to_path_buf();
        let home = root.join("home");
        let socket = root.join("run/watchsock");
        let state_dir = root.join("state");
        let config_path = root.join("config.toml");

        fs::create_dir_all(&home)?;

        let patterns = ignore_patterns
            .iter()
            .map(|p| format!("{:?}", p))
            .collect::<Vec<_>>()
            .join(", ");
        fs::write(
            &config_path,
            format!(
                "watch_root = {:?}\nsocket_path = {:?}\nstate_dir = {:?}\nignore_patterns = [{}]\n",
                home.display().to_string(),
                socket.display().to_string(),
                state_dir.display().to_string(),
                patterns
            ),
        )?;

        Ok(Self {
            _temp_dir: temp_dir,
            root,
            home,
            socket,
            state_dir,
            config_path,
        })
    }

    /// Create directories (relative to home)
    pub fn mkdirs(&self, rel: &[&str]) -> Result<()> {
        for dir in rel {
            fs::create_dir_all(self.home.join(dir))?;
        }
        Ok(())
    }

    /// Write a file (relative to home)
    pub fn write(&self, rel: &str, contents: &str) -> Result<()> {
        fs::write(self.home.join(rel), contents)?;
        Ok(())
    }

    /// Block until the daemon's socket appears
    pub fn wait_for_socket(&self, timeout: Duration) -> bool {
        wait_until(timeout, || self.socket.exists())
    }

    pub fn lock_path(&self) -> PathBuf {
        self.state_dir.join("daemon.lock")
    }

    pub fn path(&self) -> &Path {
        &self.home
    }
}

/// Poll `cond` every 20ms until it holds or `timeout` passes
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    cond()
}
