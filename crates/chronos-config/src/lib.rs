//! Git-style INI configuration: parsing, lookup across layered files, and
//! the user identity used for commits and tags.

pub mod env;
pub mod error;
pub mod file;
pub mod parse;
pub mod set;
pub mod types;

pub use error::ConfigError;
pub use file::ConfigFile;
pub use set::{global_ignore_path, ConfigSet};
pub use types::{parse_bool, parse_int};

use bstr::{BString, ByteSlice};

/// Where a value came from, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigScope {
    /// `$XDG_CONFIG_HOME/git/config` or `~/.gitconfig`
    Global,
    /// `.git/config`
    Local,
    /// `CHRONOS_AUTHOR_*` variables
    Env,
}

/// A normalized configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigKey {
    /// Lowercased section name.
    pub section: BString,
    /// Case-preserved subsection name.
    pub subsection: Option<BString>,
    /// Lowercased variable name.
    pub name: BString,
}

impl ConfigKey {
    /// Parse `section.name` or `section.subsection.name`.
    ///
    /// The subsection is everything between the first and the last dot, so
    /// it may itself contain dots.
    pub fn parse(key: &str) -> Result<Self, ConfigError> {
        let key = key.trim();
        let (section, rest) = key
            .split_once('.')
            .ok_or_else(|| ConfigError::InvalidKey(format!("missing section: {key}")))?;
        let (subsection, name) = match rest.rsplit_once('.') {
            Some((sub, name)) => (Some(BString::from(sub)), name),
            None => (None, rest),
        };
        if section.is_empty() || name.is_empty() {
            return Err(ConfigError::InvalidKey(key.to_string()));
        }
        Ok(Self {
            section: BString::from(section.to_ascii_lowercase()),
            subsection,
            name: BString::from(name.to_ascii_lowercase()),
        })
    }

    pub fn to_canonical(&self) -> String {
        match &self.subsection {
            Some(sub) => format!(
                "{}.{}.{}",
                self.section.to_str_lossy(),
                sub.to_str_lossy(),
                self.name.to_str_lossy()
            ),
            None => format!("{}.{}", self.section.to_str_lossy(), self.name.to_str_lossy()),
        }
    }

    /// Section and name were lowercased on construction; the subsection
    /// compares case-sensitively.
    pub fn matches(&self, other: &ConfigKey) -> bool {
        self == other
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

/// One `key = value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: ConfigKey,
    /// `None` for a bare key with no `=`, which reads as boolean true.
    pub value: Option<BString>,
    pub scope: ConfigScope,
    pub line_number: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_key() {
        let key = ConfigKey::parse("User.Name").unwrap();
        assert_eq!(key.section, "user");
        assert!(key.subsection.is_none());
        assert_eq!(key.name, "name");
        assert_eq!(key.to_string(), "user.name");
    }

    #[test]
    fn subsection_keeps_case_and_dots() {
        let key = ConfigKey::parse("url.https://Example.com/.insteadOf").unwrap();
        assert_eq!(key.subsection.as_ref().unwrap(), "https://Example.com/");
        assert_eq!(key.name, "insteadof");
        assert!(!key.matches(&ConfigKey::parse("url.https://example.com/.insteadof").unwrap()));
    }

    #[test]
    fn bad_keys() {
        for key in ["", "nodot", "section.", ".name"] {
            assert!(ConfigKey::parse(key).is_err(), "{key:?}");
        }
    }
}
