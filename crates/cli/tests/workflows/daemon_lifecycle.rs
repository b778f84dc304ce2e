//! Foreground daemon: start, query, stop

use crate::common::cli::{wait_with_timeout, CommandResult};
use crate::common::fixtures::wait_until;
use crate::common::TestHome;
use crate::recentd;
use anyhow::Result;
use std::process::Child;
use std::time::Duration;

const STARTUP: Duration = Duration::from_secs(10);
const SETTLE: Duration = Duration::from_secs(5);

fn start_foreground(env: &TestHome) -> Result<Child> {
    let child = recentd!(env.path(), "start", "--foreground")
        .config(&env.config_path)
        .spawn()?;
    assert!(
        env.wait_for_socket(STARTUP),
        "daemon did not create {}",
        env.socket.display()
    );
    // The socket is bound before the initial walk; a served query means
    // every watch is in place.
    wait_for_query(env, "\n")?;
    Ok(child)
}

fn query(env: &TestHome) -> Result<CommandResult> {
    recentd!(env.path(), "query")
        .config(&env.config_path)
        .assert_success()
}

/// Poll `recentd query` until it prints exactly `expected`
fn wait_for_query(env: &TestHome, expected: &str) -> Result<()> {
    let mut last = String::new();
    let matched = wait_until(SETTLE, || match query(env) {
        Ok(result) => {
            last = result.stdout;
            last == expected
        }
        Err(_) => false,
    });
    assert!(matched, "expected {:?}, last query printed {:?}", expected, last);
    Ok(())
}

fn stop(env: &TestHome, mut child: Child) -> Result<()> {
    let result = recentd!(env.path(), "stop")
        .config(&env.config_path)
        .assert_success()?;
    assert!(result.contains_stdout("Daemon stopped"));

    let code = wait_with_timeout(&mut child, STARTUP)?;
    assert_eq!(code, Some(0));
    Ok(())
}

#[test]
fn test_query_lists_most_recent_first() -> Result<()> {
    let env = TestHome::new(&[])?;
    env.mkdirs(&["src", "docs"])?;
    let daemon = start_foreground(&env)?;

    env.write("src/main.rs", "fn main() {}")?;
    wait_for_query(&env, "src\n")?;

    env.write("docs/readme.md", "# readme")?;
    wait_for_query(&env, "docs\nsrc\n")?;

    env.write("src/lib.rs", "")?;
    wait_for_query(&env, "src\ndocs\n")?;

    stop(&env, daemon)
}

#[test]
fn test_ignored_directories_are_not_reported() -> Result<()> {
    let env = TestHome::new(&["*/Mail"])?;
    env.mkdirs(&["Mail/inbox", "notes"])?;
    let daemon = start_foreground(&env)?;

    env.write("Mail/inbox/1", "hello")?;
    env.write("notes/todo.txt", "milk")?;
    wait_for_query(&env, "notes\n")?;

    stop(&env, daemon)
}

#[test]
fn test_new_directories_are_watched() -> Result<()> {
    let env = TestHome::new(&[])?;
    let daemon = start_foreground(&env)?;

    env.mkdirs(&["projects/app"])?;

    // The watch on the new subtree is added asynchronously; keep touching
    // until the daemon reports it.
    let mut last = String::new();
    let seen = wait_until(SETTLE, || {
        if env.write("projects/app/Cargo.toml", "[package]").is_err() {
            return false;
        }
        match query(&env) {
            Ok(result) => {
                last = result.stdout;
                last.lines().next() == Some("projects/app")
            }
            Err(_) => false,
        }
    });
    assert!(seen, "new directory never reported, last query printed {:?}", last);

    stop(&env, daemon)
}

#[test]
fn test_status_and_second_start() -> Result<()> {
    let env = TestHome::new(&[])?;
    let daemon = start_foreground(&env)?;

    let status = recentd!(env.path(), "status")
        .config(&env.config_path)
        .assert_success()?;
    assert!(status.contains_stdout("running"));
    assert!(status.contains_stdout(&format!("pid {}", daemon.id())));

    // The lock file keeps a second daemon out
    recentd!(env.path(), "start", "--foreground")
        .config(&env.config_path)
        .assert_failure()?;
    assert!(env.lock_path().exists());

    stop(&env, daemon)
}
