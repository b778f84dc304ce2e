//! IPC between clients and the daemon
//!
//! Connecting is the whole request: the server writes the recency list as
//! newline-terminated lines and closes the connection.

use anyhow::{Context, Result};
use recent_core::RecencyCache;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, info, warn};

/// Wire format: entries joined by `\n`, plus a trailing `\n`
pub fn render_snapshot(entries: &[String]) -> String {
    let mut out = entries.join("\n");
    out.push('\n');
    out
}

/// Remove a socket file left behind by a previous run
///
/// Only "not found" is tolerated.
pub fn remove_stale_socket(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed stale socket {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove stale socket {}", path.display())),
    }
}

/// IPC server for daemon
pub struct IpcServer {
    listener: UnixListener,
    path: PathBuf,
    cache: Arc<RecencyCache>,
    write_timeout: Duration,
}

impl IpcServer {
    /// Bind the socket, replacing any stale file
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(path: &Path, cache: Arc<RecencyCache>, write_timeout: Duration) -> Result<Self> {
        remove_stale_socket(path)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory {}", parent.display()))?;
        }

        let listener = UnixListener::bind(path)
            .with_context(|| format!("Failed to bind socket {}", path.display()))?;

        Ok(Self {
            listener,
            path: path.to_path_buf(),
            cache,
            write_timeout,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Answer connections one at a time until `shutdown` resolves
    ///
    /// Returns the number of clients that received a full response.
    pub async fn serve<F>(self, shutdown: F) -> Result<u64>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut served = 0u64;

        info!("Listening on {}", self.path.display());

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, _)) => {
                        if self.respond(stream).await {
                            served += 1;
                        }
                    }
                    Err(e) => warn!("Failed to accept connection: {}", e),
                },
            }
        }

        Ok(served)
    }

    /// Write one snapshot; the stream is closed when dropped
    async fn respond(&self, mut stream: UnixStream) -> bool {
        let body = render_snapshot(&self.cache.snapshot());

        let write = async {
            stream.write_all(body.as_bytes()).await?;
            stream.shutdown().await
        };

        match tokio::time::timeout(self.write_timeout, write).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!("Client went away before the response was written: {}", e);
                false
            }
            Err(_) => {
                warn!(
                    "Client did not read the response within {:?}, dropping it",
                    self.write_timeout
                );
                false
            }
        }
    }
}

/// IPC client for talking to the daemon
pub struct IpcClient {
    stream: UnixStream,
}

impl IpcClient {
    /// Connect to daemon
    pub async fn connect(path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(path).await.with_context(|| {
            format!(
                "Failed to connect to {} (is the daemon running?)",
                path.display()
            )
        })?;
        Ok(Self { stream })
    }

    /// Read the full response, exactly as sent
    pub async fn read_raw(mut self) -> Result<String> {
        let mut buf = String::new();
        self.stream
            .read_to_string(&mut buf)
            .await
            .context("Failed to read response from daemon")?;
        Ok(buf)
    }

    /// Read the response as a list of directories
    pub async fn recent(self) -> Result<Vec<String>> {
        let raw = self.read_raw().await?;
        Ok(raw
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
