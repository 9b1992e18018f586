//! A single configuration file.

use std::path::{Path, PathBuf};

use bstr::{BStr, BString, ByteSlice};

use crate::error::ConfigError;
use crate::parse::parse_config;
use crate::{ConfigEntry, ConfigKey, ConfigScope};

/// The entries of one config file, in file order.
///
/// Writing regenerates the file from its entries: comments and the original
/// layout are not preserved.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: Option<PathBuf>,
    scope: ConfigScope,
    entries: Vec<ConfigEntry>,
}

impl ConfigFile {
    pub fn new(scope: ConfigScope) -> Self {
        Self {
            path: None,
            scope,
            entries: Vec::new(),
        }
    }

    pub fn parse(input: &[u8], path: Option<&Path>, scope: ConfigScope) -> Result<Self, ConfigError> {
        let filename = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".into());
        Ok(Self {
            path: path.map(Path::to_path_buf),
            scope,
            entries: parse_config(input, &filename, scope)?,
        })
    }

    pub fn load(path: &Path, scope: ConfigScope) -> Result<Self, ConfigError> {
        match std::fs::read(path) {
            Ok(data) => Self::parse(&data, Some(path), scope),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn scope(&self) -> ConfigScope {
        self.scope
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// The last value for `key`. `Some(None)` is a bare key.
    pub fn get(&self, key: &ConfigKey) -> Option<Option<&BStr>> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key.matches(key))
            .map(|e| e.value.as_ref().map(|v| v.as_bstr()))
    }

    /// Replace the last value for `key`, or append it.
    pub fn set(&mut self, key: &ConfigKey, value: &str) {
        let value = Some(BString::from(value));
        if let Some(entry) = self.entries.iter_mut().rev().find(|e| e.key.matches(key)) {
            entry.value = value;
            return;
        }
        // Keep the new key next to its section if there is one.
        let pos = self
            .entries
            .iter()
            .rposition(|e| e.key.section == key.section && e.key.subsection == key.subsection)
            .map_or(self.entries.len(), |p| p + 1);
        self.entries.insert(
            pos,
            ConfigEntry {
                key: key.clone(),
                value,
                scope: self.scope,
                line_number: None,
            },
        );
    }

    /// Remove every value for `key`. Returns whether any existed.
    pub fn remove(&mut self, key: &ConfigKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| !e.key.matches(key));
        self.entries.len() < before
    }

    /// Render as config text.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut current: Option<(&BString, Option<&BString>)> = None;
        for entry in &self.entries {
            let header = (&entry.key.section, entry.key.subsection.as_ref());
            if current != Some(header) {
                out.push(b'[');
                out.extend_from_slice(&entry.key.section);
                if let Some(sub) = &entry.key.subsection {
                    out.extend_from_slice(b" \"");
                    for &b in sub.iter() {
                        if b == b'"' || b == b'\\' {
                            out.push(b'\\');
                        }
                        out.push(b);
                    }
                    out.push(b'"');
                }
                out.extend_from_slice(b"]\n");
                current = Some(header);
            }
            out.push(b'\t');
            out.extend_from_slice(&entry.key.name);
            if let Some(value) = &entry.value {
                out.extend_from_slice(b" = ");
                out.extend_from_slice(&quote_value(value));
            }
            out.push(b'\n');
        }
        out
    }

    /// Atomically replace `path` with this file's contents.
    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        chronos_utils::atomic::write_atomic(path, &self.to_bytes())?;
        Ok(())
    }
}

/// Escape a value so that parsing it yields the same bytes.
fn quote_value(value: &[u8]) -> Vec<u8> {
    let needs_quotes = value.first().is_some_and(|b| b.is_ascii_whitespace())
        || value.last().is_some_and(|b| b.is_ascii_whitespace())
        || value.iter().any(|&b| b == b'#' || b == b';');
    let mut out = Vec::with_capacity(value.len() + 2);
    if needs_quotes {
        out.push(b'"');
    }
    for &b in value {
        match b {
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x08 => out.extend_from_slice(b"\\b"),
            b'"' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            _ => out.push(b),
        }
    }
    if needs_quotes {
        out.push(b'"');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> ConfigKey {
        ConfigKey::parse(k).unwrap()
    }

    #[test]
    fn last_value_wins() {
        let file = ConfigFile::parse(b"[a]\n\tx = 1\n[a]\n\tx = 2\n", None, ConfigScope::Local)
            .unwrap();
        assert_eq!(file.get(&key("a.x")), Some(Some(BStr::new("2"))));
        assert_eq!(file.get(&key("a.y")), None);
    }

    #[test]
    fn set_and_render() {
        let mut file = ConfigFile::new(ConfigScope::Local);
        file.set(&key("core.repositoryformatversion"), "0");
        file.set(&key("core.filemode"), "false");
        file.set(&key("user.name"), " spaced ");
        file.set(&key("core.bare"), "false");
        file.set(&key("core.filemode"), "true");

        let text = String::from_utf8(file.to_bytes()).unwrap();
        assert_eq!(
            text,
            "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n[user]\n\tname = \" spaced \"\n"
        );

        let back = ConfigFile::parse(text.as_bytes(), None, ConfigScope::Local).unwrap();
        assert_eq!(back.get(&key("user.name")), Some(Some(BStr::new(" spaced "))));
    }

    #[test]
    fn render_roundtrips_awkward_values() {
        let mut file = ConfigFile::new(ConfigScope::Local);
        file.set(&key("remote.my \"o\".url"), "a#b;c\\d\"e\tf");
        let back = ConfigFile::parse(&file.to_bytes(), None, ConfigScope::Local).unwrap();
        let pairs = |f: &ConfigFile| {
            f.entries()
                .iter()
                .map(|e| (e.key.clone(), e.value.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(&back), pairs(&file));
    }

    #[test]
    fn remove_key() {
        let mut file = ConfigFile::parse(b"[a]\n\tx = 1\n\tx = 2\n\ty\n", None, ConfigScope::Local)
            .unwrap();
        assert!(file.remove(&key("a.x")));
        assert!(!file.remove(&key("a.x")));
        assert_eq!(file.get(&key("a.y")), Some(None));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ConfigFile::load(&dir.path().join("config"), ConfigScope::Local),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
