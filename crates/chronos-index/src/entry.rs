//! Index entry types: IndexEntry, StatData, EntryType.

use std::fmt;

use bstr::BString;
use chronos_hash::ObjectId;
use chronos_object::FileMode;

use crate::Stage;

/// A single entry in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Path relative to the worktree root, `/`-separated.
    pub path: BString,
    /// Blob id of the staged content.
    pub oid: ObjectId,
    pub mode_type: EntryType,
    /// The low 12 bits of the mode (`0o644`, `0o755`, ...).
    pub mode_perms: u16,
    pub stage: Stage,
    pub stat: StatData,
    /// The assume-valid (`CE_VALID`) bit.
    pub assume_valid: bool,
}

impl IndexEntry {
    /// A stage-0 regular file entry with `0o644` permissions.
    pub fn new(path: BString, oid: ObjectId, stat: StatData) -> Self {
        Self {
            path,
            oid,
            mode_type: EntryType::Regular,
            mode_perms: 0o644,
            stage: Stage::Normal,
            stat,
            assume_valid: false,
        }
    }

    /// The packed 16-bit mode as stored on disk.
    pub fn mode_bits(&self) -> u16 {
        (self.mode_type.bits() << 12) | (self.mode_perms & 0x0FFF)
    }

    /// The mode as it appears in a tree entry.
    pub fn file_mode(&self) -> FileMode {
        FileMode::from_type_and_perms(self.mode_type.bits(), self.mode_perms)
    }
}

/// The 4-bit object type packed into an entry's mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Regular,
    Symlink,
    Gitlink,
}

impl EntryType {
    pub fn bits(&self) -> u16 {
        match self {
            EntryType::Regular => 0b1000,
            EntryType::Symlink => 0b1010,
            EntryType::Gitlink => 0b1110,
        }
    }

    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0b1000 => Some(EntryType::Regular),
            0b1010 => Some(EntryType::Symlink),
            0b1110 => Some(EntryType::Gitlink),
            _ => None,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryType::Regular => "regular file",
            EntryType::Symlink => "symlink",
            EntryType::Gitlink => "git link",
        })
    }
}

/// File system stat data cached in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatData {
    pub ctime_secs: u32,
    pub ctime_nsecs: u32,
    pub mtime_secs: u32,
    pub mtime_nsecs: u32,
    pub dev: u32,
    pub ino: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl StatData {
    /// Capture from file system metadata. Values are truncated to 32 bits
    /// as the on-disk format requires.
    #[cfg(unix)]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            ctime_secs: meta.ctime() as u32,
            ctime_nsecs: meta.ctime_nsec() as u32,
            mtime_secs: meta.mtime() as u32,
            mtime_nsecs: meta.mtime_nsec() as u32,
            dev: meta.dev() as u32,
            ino: meta.ino() as u32,
            uid: meta.uid(),
            gid: meta.gid(),
            size: meta.len() as u32,
        }
    }

    #[cfg(not(unix))]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::time::UNIX_EPOCH;
        let since_epoch = |t: std::io::Result<std::time::SystemTime>| {
            t.ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .unwrap_or_default()
        };
        let mtime = since_epoch(meta.modified());
        let ctime = since_epoch(meta.created());
        Self {
            ctime_secs: ctime.as_secs() as u32,
            ctime_nsecs: ctime.subsec_nanos(),
            mtime_secs: mtime.as_secs() as u32,
            mtime_nsecs: mtime.subsec_nanos(),
            dev: 0,
            ino: 0,
            uid: 0,
            gid: 0,
            size: meta.len() as u32,
        }
    }

    /// ctime as `seconds * 10^9 + nanoseconds`.
    pub fn ctime_ns(&self) -> u64 {
        self.ctime_secs as u64 * 1_000_000_000 + self.ctime_nsecs as u64
    }

    /// mtime as `seconds * 10^9 + nanoseconds`.
    pub fn mtime_ns(&self) -> u64 {
        self.mtime_secs as u64 * 1_000_000_000 + self.mtime_nsecs as u64
    }

    /// Whether both timestamps agree with `other`.
    pub fn same_times(&self, other: &StatData) -> bool {
        self.ctime_ns() == other.ctime_ns() && self.mtime_ns() == other.mtime_ns()
    }
}
