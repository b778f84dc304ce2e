//! Ignore pattern matching
//!
//! Patterns use fnmatch semantics without `FNM_PATHNAME`: `*` also matches
//! `/`, so `*/.git` excludes a `.git` directory at any depth. A leading `~`
//! expands to the home directory. All patterns are compiled into one
//! [`GlobSet`] and matched against the full path; any match excludes.

use crate::error::{Result, WatchError};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use recent_core::paths::expand_tilde;
use std::path::Path;

/// Compiled ignore patterns
pub struct IgnoreMatcher {
    set: GlobSet,

    /// Expanded patterns, in configuration order
    patterns: Vec<String>,
}

impl IgnoreMatcher {
    /// Compile `patterns`, expanding `~` against `home`
    pub fn compile<I, S>(patterns: I, home: &Path) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut expanded = Vec::new();

        for pattern in patterns {
            let pattern = expand_tilde(pattern.as_ref(), home);
            let glob = GlobBuilder::new(&escape_braces(&pattern))
                .literal_separator(false)
                .backslash_escape(true)
                .build()
                .map_err(|source| WatchError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
            expanded.push(pattern);
        }

        let set = builder.build().map_err(|source| WatchError::InvalidPattern {
            pattern: expanded.join(", "),
            source,
        })?;

        Ok(Self {
            set,
            patterns: expanded,
        })
    }

    /// Matcher that excludes nothing
    pub fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
            patterns: vec![],
        }
    }

    /// True if `path` matches any pattern
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.set.is_match(path)
    }

    /// Expanded patterns
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Make `{` and `}` literal outside character classes
///
/// fnmatch has no brace alternation, while globset would read `{a,b}` as one.
fn escape_braces(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' if !in_class => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
                // A leading negation or `]` belongs to the class
                if let Some(&n) = chars.peek() {
                    if n == '!' || n == '^' {
                        out.push(n);
                        chars.next();
                    }
                }
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '{' | '}' if !in_class => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Read extra patterns from an ignore file
///
/// One pattern per line; blank lines and lines starting with `#` are
/// skipped. A missing file yields no patterns.
pub fn load_ignore_file(path: &Path) -> Result<Vec<String>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
        Err(source) => {
            return Err(WatchError::IgnoreFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    Ok(contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
