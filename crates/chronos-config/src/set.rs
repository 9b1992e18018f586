//! Merged multi-file configuration view.

use std::path::{Path, PathBuf};

use bstr::{BString, ByteSlice};

use crate::error::ConfigError;
use crate::file::ConfigFile;
use crate::types;
use crate::{ConfigEntry, ConfigKey, ConfigScope};

/// Configuration from every source, later sources overriding earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ConfigSet {
    /// In precedence order, low to high.
    files: Vec<ConfigFile>,
    env_overrides: Vec<ConfigEntry>,
}

impl ConfigSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the global files, then `<git_dir>/config`, then the
    /// `CHRONOS_AUTHOR_*` overrides. Missing files are skipped.
    pub fn load(git_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let mut set = Self::new();
        for path in global_paths() {
            set.add_path(&path, ConfigScope::Global)?;
        }
        if let Some(git_dir) = git_dir {
            set.add_path(&git_dir.join("config"), ConfigScope::Local)?;
        }
        set.env_overrides = crate::env::load_env_overrides();
        Ok(set)
    }

    /// Load `path` if it exists.
    pub fn add_path(&mut self, path: &Path, scope: ConfigScope) -> Result<(), ConfigError> {
        match ConfigFile::load(path, scope) {
            Ok(file) => {
                self.add_file(file);
                Ok(())
            }
            Err(ConfigError::FileNotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn add_file(&mut self, file: ConfigFile) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[ConfigFile] {
        &self.files
    }

    /// The winning raw value. `Some(None)` is a bare key.
    fn get_raw(&self, key: &ConfigKey) -> Option<Option<BString>> {
        if let Some(entry) = self.env_overrides.iter().rev().find(|e| e.key.matches(key)) {
            return Some(entry.value.clone());
        }
        self.files
            .iter()
            .rev()
            .find_map(|f| f.get(key))
            .map(|v| v.map(|v| BString::from(v.as_bytes())))
    }

    pub fn get_string(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let key = ConfigKey::parse(key)?;
        Ok(self
            .get_raw(&key)
            .map(|v| v.map(|v| v.to_str_lossy().into_owned()).unwrap_or_default()))
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        let key = ConfigKey::parse(key)?;
        self.get_raw(&key)
            .map(|v| types::parse_bool(v.as_ref().map(|v| v.as_bstr())))
            .transpose()
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        Ok(self.get_bool(key)?.unwrap_or(default))
    }

    pub fn get_int(&self, key: &str) -> Result<Option<i64>, ConfigError> {
        let key = ConfigKey::parse(key)?;
        match self.get_raw(&key) {
            Some(Some(value)) => Ok(Some(types::parse_int(value.as_bstr())?)),
            Some(None) => Err(ConfigError::InvalidInt(format!("{key}: missing value"))),
            None => Ok(None),
        }
    }

    /// `"Name <email>"` from `user.name` and `user.email`, if both are set.
    pub fn user_identity(&self) -> Result<Option<String>, ConfigError> {
        let name = self.get_string("user.name")?;
        let email = self.get_string("user.email")?;
        Ok(match (name, email) {
            (Some(name), Some(email)) if !name.trim().is_empty() => {
                Some(format!("{} <{}>", name.trim(), email.trim()))
            }
            _ => None,
        })
    }
}

/// `$XDG_CONFIG_HOME/git/config` (or `~/.config/git/config`), then
/// `~/.gitconfig`.
fn global_paths() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let xdg = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| home.as_ref().map(|h| h.join(".config")));

    let mut paths = Vec::new();
    if let Some(xdg) = xdg {
        paths.push(xdg.join("git").join("config"));
    }
    if let Some(home) = home {
        paths.push(home.join(".gitconfig"));
    }
    paths
}

/// `$XDG_CONFIG_HOME/git/ignore` (or `~/.config/git/ignore`).
pub fn global_ignore_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .map(|base| base.join("git").join("ignore"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(text: &str, scope: ConfigScope) -> ConfigFile {
        ConfigFile::parse(text.as_bytes(), None, scope).unwrap()
    }

    #[test]
    fn later_files_override() {
        let mut set = ConfigSet::new();
        set.add_file(file("[user]\n\tname = Global\n\temail = g@x\n", ConfigScope::Global));
        set.add_file(file("[user]\n\tname = Local\n", ConfigScope::Local));
        assert_eq!(set.get_string("user.name").unwrap().as_deref(), Some("Local"));
        assert_eq!(set.user_identity().unwrap().as_deref(), Some("Local <g@x>"));
    }

    #[test]
    fn identity_needs_both_parts() {
        let mut set = ConfigSet::new();
        set.add_file(file("[user]\n\tname = Only Name\n", ConfigScope::Global));
        assert_eq!(set.user_identity().unwrap(), None);
    }

    #[test]
    fn typed_getters() {
        let mut set = ConfigSet::new();
        set.add_file(file(
            "[core]\n\trepositoryformatversion = 0\n\tbare\n\tfilemode = no\n",
            ConfigScope::Local,
        ));
        assert_eq!(set.get_int("core.repositoryformatversion").unwrap(), Some(0));
        assert_eq!(set.get_bool("core.bare").unwrap(), Some(true));
        assert!(!set.get_bool_or("core.filemode", true).unwrap());
        assert!(set.get_bool_or("core.missing", true).unwrap());
        assert!(set.get_int("core.bare").is_err());
    }

    #[test]
    fn missing_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = ConfigSet::new();
        set.add_path(&dir.path().join("nope"), ConfigScope::Global).unwrap();
        assert!(set.files().is_empty());
    }
}
