//! Path helpers shared by the config loader, the ignore matcher and the cache

use std::path::{Path, PathBuf};

/// Replace a leading `~` with `home`.
///
/// Only `~` alone or `~/...` is expanded; `~user` forms are left untouched.
pub fn expand_tilde(raw: &str, home: &Path) -> String {
    if raw == "~" {
        return home.to_string_lossy().into_owned();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => format!("{}/{}", home.to_string_lossy().trim_end_matches('/'), rest),
        None => raw.to_string(),
    }
}

/// Same as [`expand_tilde`] for path values
pub fn expand_tilde_path(raw: &Path, home: &Path) -> PathBuf {
    match raw.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => raw.to_path_buf(),
    }
}

/// Render `dir` the way the recency cache stores it.
///
/// Returns `None` for the home directory itself, a home-relative string for
/// anything strictly below home, and the absolute path otherwise.
pub fn relative_to_home(dir: &Path, home: &Path) -> Option<String> {
    match dir.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => None,
        Ok(rest) => Some(rest.to_string_lossy().into_owned()),
        Err(_) => Some(dir.to_string_lossy().into_owned()),
    }
}
