//! Print the recently used directories

use crate::util;
use anyhow::Result;
use cli_lib::ipc::IpcClient;
use std::io::Write;
use std::path::Path;

/// Writes the daemon's response verbatim, so shell consumers see the wire format
pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let (config, _home) = util::load_config(config_path)?;

    let raw = IpcClient::connect(&config.socket_path).await?.read_raw().await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(raw.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
