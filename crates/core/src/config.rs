//! Daemon configuration
//!
//! Loaded from `$XDG_CONFIG_HOME/recentd/config.toml` (or an explicit path).
//! Every field is optional; a missing file means all defaults.

use crate::paths::expand_tilde_path;
use crate::DEFAULT_CACHE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Root of the watched tree (default: home directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_root: Option<PathBuf>,

    /// Additional trees to watch (e.g. `/media`)
    pub extra_roots: Vec<PathBuf>,

    /// Unix socket the query server binds
    pub socket_path: PathBuf,

    /// Glob patterns excluded from watching (`~` expands to home)
    pub ignore_patterns: Vec<String>,

    /// File with one extra ignore pattern per line; `""` disables it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_file: Option<PathBuf>,

    /// Number of directories remembered
    pub cache_size: usize,

    /// Upper bound on writing one response to a client
    pub write_timeout_ms: u64,

    /// Directory for the lock file and daemon log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            watch_root: None,
            extra_roots: vec![],
            socket_path: PathBuf::from("~/.watchsock"),
            ignore_patterns: vec!["*/.git".to_string(), "*/.svn".to_string()],
            ignore_file: Some(PathBuf::from("~/.watch-ignore")),
            cache_size: DEFAULT_CACHE_SIZE,
            write_timeout_ms: 1000,
            state_dir: None,
        }
    }
}

impl DaemonConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.cache_size) {
            return Err(ConfigError::Invalid(format!(
                "cache_size must be between 1 and 100 (got {})",
                self.cache_size
            )));
        }
        if !(1..=60_000).contains(&self.write_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "write_timeout_ms must be between 1 and 60000 (got {})",
                self.write_timeout_ms
            )));
        }
        if self.socket_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("socket_path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Expand `~` in every path field and fill in path defaults
    pub fn expand(mut self, home: &Path) -> Self {
        self.watch_root = Some(match self.watch_root.take() {
            Some(root) => expand_tilde_path(&root, home),
            None => home.to_path_buf(),
        });
        self.extra_roots = self
            .extra_roots
            .iter()
            .map(|root| expand_tilde_path(root, home))
            .collect();
        self.socket_path = expand_tilde_path(&self.socket_path, home);
        self.ignore_file = self
            .ignore_file
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| expand_tilde_path(&p, home));
        self.state_dir = Some(match self.state_dir.take() {
            Some(dir) => expand_tilde_path(&dir, home),
            None => default_state_dir(home),
        });
        self
    }

    /// Every root to install watches under, primary root first
    pub fn roots(&self, home: &Path) -> Vec<PathBuf> {
        let mut roots = vec![self
            .watch_root
            .as_deref()
            .map(|r| expand_tilde_path(r, home))
            .unwrap_or_else(|| home.to_path_buf())];
        for extra in &self.extra_roots {
            let extra = expand_tilde_path(extra, home);
            if !roots.contains(&extra) {
                roots.push(extra);
            }
        }
        roots
    }

    /// Lock file location
    pub fn lock_path(&self, home: &Path) -> PathBuf {
        self.state_dir(home).join("daemon.lock")
    }

    /// Background daemon log location
    pub fn log_path(&self, home: &Path) -> PathBuf {
        self.state_dir(home).join("daemon.log")
    }

    fn state_dir(&self, home: &Path) -> PathBuf {
        match &self.state_dir {
            Some(dir) => expand_tilde_path(dir, home),
            None => default_state_dir(home),
        }
    }
}

fn default_state_dir(home: &Path) -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| home.join(".cache"))
        .join("recentd")
}

/// The user's home directory
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::NoHomeDir)
}

/// Default config file location
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("recentd").join("config.toml"))
}

/// Load configuration from `path`, or the default location
///
/// A missing file yields the defaults. The result is validated but not expanded.
pub fn load(path: Option<&Path>) -> Result<DaemonConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_file_path() {
            Some(p) => p,
            None => return Ok(DaemonConfig::default()),
        },
    };

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(DaemonConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let config = parse(&contents).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from TOML text
pub fn parse(contents: &str) -> Result<DaemonConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Write configuration to `path`, creating parent directories
pub fn save(config: &DaemonConfig, path: &Path) -> Result<(), ConfigError> {
    config.validate()?;
    let serialized = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, serialized).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Create the config file with defaults if it does not exist yet
///
/// Returns true if a file was written.
pub fn init_if_missing(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    save(&DaemonConfig::default(), path)?;
    Ok(true)
}

/// Annotated example configuration
pub fn example_config() -> &'static str {
    r#"# recentd configuration

# Root of the watched tree (default: home directory)
# watch_root = "~"

# Additional trees to watch
extra_roots = ["/media"]

# Socket the query server listens on
socket_path = "~/.watchsock"

# Directories matching any of these are neither watched nor descended into.
# `*` also matches `/`, so "*/.git" excludes .git at any depth.
ignore_patterns = [
    "~/Mail",
    "~/.*",
    "*/.git",
    "*/.svn",
    "*/tiles",
    "~/logs",
]

# One more pattern per line; missing file is fine, "" turns it off
ignore_file = "~/.watch-ignore"

# Number of directories remembered (1-100)
cache_size = 5

# Give up on a client that does not read its response in time (1-60000)
write_timeout_ms = 1000

# Lock file and daemon log
# state_dir = "~/.cache/recentd"
"#
}
