//! Index (staging area) for chronos.
//!
//! The index file (`.git/index`) records one entry per staged path with the
//! file's stat data and blob id. It is the sole description of what the next
//! commit will contain. The file is read whole, mutated in memory and
//! written back whole.

pub mod entry;
pub mod ignore;
mod read;
mod write;

use std::path::Path;

use bstr::BStr;
use tracing::debug;

pub use entry::{EntryType, IndexEntry, StatData};
pub use error::IndexError;
pub use ignore::{IgnoreRule, IgnoreRules};

mod error {
    #[derive(Debug, thiserror::Error)]
    pub enum IndexError {
        #[error("corrupt index at offset {offset}: {reason}")]
        Corrupt { offset: usize, reason: String },

        #[error("unsupported index version: {0}")]
        UnsupportedVersion(u32),

        #[error("index checksum mismatch")]
        ChecksumMismatch,

        #[error("ignore rules are matched against relative paths, got '{0}'")]
        AbsolutePath(String),

        #[error(transparent)]
        Util(#[from] chronos_utils::UtilError),

        #[error(transparent)]
        Hash(#[from] chronos_hash::HashError),

        #[error(transparent)]
        Io(#[from] std::io::Error),
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;

/// The only on-disk format version read or written.
pub const INDEX_VERSION: u32 = 2;

/// Merge stage of an entry. Chronos only ever writes [`Stage::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Normal,
    Base,
    Ours,
    Theirs,
}

impl Stage {
    pub fn as_u8(&self) -> u8 {
        match self {
            Stage::Normal => 0,
            Stage::Base => 1,
            Stage::Ours => 2,
            Stage::Theirs => 3,
        }
    }

    /// From the two stage bits of the entry flags.
    pub fn from_bits(bits: u16) -> Self {
        match bits & 0x3 {
            0 => Stage::Normal,
            1 => Stage::Base,
            2 => Stage::Ours,
            _ => Stage::Theirs,
        }
    }
}

/// The staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    version: u32,
    /// Sorted by (path, stage).
    entries: Vec<IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self {
            version: INDEX_VERSION,
            entries: Vec::new(),
        }
    }

    /// Parse an index file.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        let index = read::parse_index(&data)?;
        debug!(path = %path.as_ref().display(), entries = index.len(), "read index");
        Ok(index)
    }

    /// Like [`read_from`](Index::read_from), but a missing file is an empty index.
    pub fn read_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::read_from(path) {
            Err(IndexError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            other => other,
        }
    }

    /// Decode index bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        read::parse_index(data)
    }

    /// Replace the file at `path` with this index.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write::write_index(self, path.as_ref())?;
        debug!(path = %path.as_ref().display(), entries = self.len(), "wrote index");
        Ok(())
    }

    /// Encode to the on-disk byte layout, trailing checksum included.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        write::serialize_index(self)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The stage-0 entry for `path`.
    pub fn get(&self, path: &BStr) -> Option<&IndexEntry> {
        self.entries
            .iter()
            .find(|e| e.path[..] == path[..] && e.stage == Stage::Normal)
    }

    pub fn contains(&self, path: &BStr) -> bool {
        self.entries.iter().any(|e| e.path[..] == path[..])
    }

    /// Add or replace an entry, keeping the list sorted.
    pub fn add(&mut self, entry: IndexEntry) {
        self.entries
            .retain(|e| !(e.path == entry.path && e.stage == entry.stage));
        let pos = self
            .entries
            .binary_search_by(|e| cmp_entries(e, &entry))
            .unwrap_or_else(|pos| pos);
        self.entries.insert(pos, entry);
    }

    /// Drop every entry for `path`. Returns whether anything was removed.
    pub fn remove(&mut self, path: &BStr) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.path[..] != path[..]);
        self.entries.len() < before
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub(crate) fn from_parts(version: u32, entries: Vec<IndexEntry>) -> Self {
        Self { version, entries }
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort order: by path bytes, then by stage.
fn cmp_entries(a: &IndexEntry, b: &IndexEntry) -> std::cmp::Ordering {
    a.path.cmp(&b.path).then(a.stage.cmp(&b.stage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bstr::BString;
    use chronos_hash::ObjectId;

    fn entry(path: &str) -> IndexEntry {
        IndexEntry::new(BString::from(path), ObjectId::NULL, StatData::default())
    }

    #[test]
    fn add_keeps_sorted_and_replaces() {
        let mut index = Index::new();
        index.add(entry("b.txt"));
        index.add(entry("a/z.txt"));
        index.add(entry("a.txt"));
        let paths: Vec<_> = index.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, ["a.txt", "a/z.txt", "b.txt"]);

        let mut replacement = entry("b.txt");
        replacement.stat.size = 42;
        index.add(replacement);
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(BStr::new("b.txt")).unwrap().stat.size, 42);
    }

    #[test]
    fn remove_reports_whether_present() {
        let mut index = Index::new();
        index.add(entry("x"));
        assert!(index.remove(BStr::new("x")));
        assert!(!index.remove(BStr::new("x")));
        assert!(index.is_empty());
    }

    #[test]
    fn missing_file_is_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let index = Index::read_or_default(dir.path().join("index")).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.version(), INDEX_VERSION);
    }

    #[test]
    fn stage_bits() {
        for n in 0..4u16 {
            assert_eq!(Stage::from_bits(n).as_u8() as u16, n);
        }
    }
}
