//! Commands that work without a running daemon

use crate::common::TestHome;
use crate::recentd;
use anyhow::Result;
use std::time::Duration;

#[test]
fn test_config_example_is_printed() -> Result<()> {
    let env = TestHome::new(&[])?;

    let result = recentd!(env.path(), "config", "--example").assert_success()?;
    assert!(result.contains_stdout("cache_size = 5"));
    // Never touches the daemon or the filesystem
    assert!(
        result.duration < Duration::from_secs(10),
        "config --example took {:?}",
        result.duration
    );
    assert!(result.contains_stdout("ignore_patterns"));
    Ok(())
}

#[test]
fn test_config_shows_effective_settings() -> Result<()> {
    let env = TestHome::new(&["*/Mail"])?;

    let result = recentd!(env.path(), "config")
        .config(&env.config_path)
        .assert_success()?;
    assert!(result.contains_stdout(&env.socket.display().to_string()));
    assert!(result.contains_stdout("*/Mail"));
    Ok(())
}

#[test]
fn test_config_create_writes_defaults_once() -> Result<()> {
    let env = TestHome::new(&[])?;
    let file = env.root.join("fresh/config.toml");

    let first = recentd!(env.path(), "config", "--create")
        .config(&file)
        .assert_success()?;
    assert!(first.contains_stdout("Created config file"));
    assert!(file.exists());

    let second = recentd!(env.path(), "config", "--create")
        .config(&file)
        .assert_success()?;
    assert!(second.contains_stdout("already exists"));
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let env = TestHome::new(&[])?;
    std::fs::write(&env.config_path, "cache_size = 0\n")?;

    recentd!(env.path(), "config")
        .config(&env.config_path)
        .assert_failure()?;
    Ok(())
}

#[test]
fn test_query_without_daemon_fails() -> Result<()> {
    let env = TestHome::new(&[])?;

    recentd!(env.path(), "query")
        .config(&env.config_path)
        .assert_failure()?;
    Ok(())
}

#[test]
fn test_status_reports_stopped() -> Result<()> {
    let env = TestHome::new(&[])?;

    let result = recentd!(env.path(), "status")
        .config(&env.config_path)
        .assert_success()?;
    assert!(result.contains_stdout("stopped"));
    Ok(())
}

#[test]
fn test_stop_without_daemon_fails() -> Result<()> {
    let env = TestHome::new(&[])?;

    let result = recentd!(env.path(), "stop")
        .config(&env.config_path)
        .assert_failure()?;
    assert!(result.contains_stderr("not running"));
    Ok(())
}
