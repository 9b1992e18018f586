use std::fmt;

use crate::error::RefError;

/// A validated reference name such as `HEAD` or `refs/heads/master`.
///
/// Rejects names that could not be stored as a file under the metadata
/// directory or that git itself would refuse:
/// - empty names and the single character `@`
/// - `..`, `@{`, `//`, control characters, space and any of `~^:?*[\`
/// - a leading or trailing `/`, a trailing `.` or `.lock`
/// - components starting with `.`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefName(String);

const FORBIDDEN_CHARS: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

impl RefName {
    pub fn new(name: impl Into<String>) -> Result<Self, RefError> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    /// `refs/heads/<branch>`.
    pub fn branch(short: &str) -> Result<Self, RefError> {
        Self::new(format!("refs/heads/{short}"))
    }

    /// `refs/tags/<tag>`.
    pub fn tag(short: &str) -> Result<Self, RefError> {
        Self::new(format!("refs/tags/{short}"))
    }

    pub fn head() -> Self {
        Self("HEAD".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without its namespace, e.g. `master` for `refs/heads/master`.
    pub fn short_name(&self) -> &str {
        ["refs/heads/", "refs/tags/", "refs/remotes/"]
            .iter()
            .find_map(|ns| self.0.strip_prefix(ns))
            .unwrap_or(&self.0)
    }
}

fn validate(name: &str) -> Result<(), RefError> {
    let bad = |why: &str| Err(RefError::InvalidName(format!("'{name}': {why}")));

    if name.is_empty() {
        return bad("empty");
    }
    if name == "@" {
        return bad("cannot be '@'");
    }
    if name.contains("..") {
        return bad("contains '..'");
    }
    if name.contains("@{") {
        return bad("contains '@{'");
    }
    if name.chars().any(|c| c.is_ascii_control() || FORBIDDEN_CHARS.contains(&c)) {
        return bad("contains a forbidden character");
    }
    if name.starts_with('/') || name.ends_with('/') || name.contains("//") {
        return bad("empty path component");
    }
    if name.ends_with('.') || name.ends_with(".lock") {
        return bad("bad ending");
    }
    if name.split('/').any(|c| c.starts_with('.')) {
        return bad("component starts with '.'");
    }
    Ok(())
}

impl fmt::Display for RefName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
