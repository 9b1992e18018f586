use std::cmp::Ordering;

use bstr::{BStr, BString, ByteSlice};
use chronos_hash::{ObjectId, OID_LEN};

use crate::{ObjectError, ObjectType};

/// The mode of a tree entry.
///
/// Stored as ASCII octal, 5 or 6 digits wide; `40000` and `040000` are the
/// same mode. The top two of six digits give the kind of entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// 100644
    Regular,
    /// 100755
    Executable,
    /// 120000
    Symlink,
    /// 160000
    Gitlink,
    /// 040000
    Tree,
    /// Any other mode, preserved as written.
    Unknown(u32),
}

impl FileMode {
    /// Parse from ASCII octal (`b"100644"`, `b"40000"`, `b"040000"`).
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        parse_octal(s)
            .map(Self::from_raw)
            .ok_or_else(|| ObjectError::InvalidFileMode(String::from_utf8_lossy(s).into()))
    }

    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0o100644 => Self::Regular,
            0o100755 => Self::Executable,
            0o120000 => Self::Symlink,
            0o160000 => Self::Gitlink,
            0o040000 => Self::Tree,
            other => Self::Unknown(other),
        }
    }

    /// Build a mode from the 4-bit type and 12-bit permissions kept in the index.
    pub fn from_type_and_perms(kind: u16, perms: u16) -> Self {
        Self::from_raw((u32::from(kind) << 12) | u32::from(perms & 0o7777))
    }

    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Gitlink => 0o160000,
            Self::Tree => 0o040000,
            Self::Unknown(v) => *v,
        }
    }

    /// The leading two of six octal digits (`04`, `10`, `12`, `16`).
    pub fn type_bits(&self) -> u32 {
        self.raw() >> 12
    }

    /// Canonical serialized form: octal without leading zeros, so trees are
    /// written as `40000`.
    pub fn as_bytes(&self) -> BString {
        BString::from(format!("{:o}", self.raw()))
    }

    /// Six-digit form used in listings (`040000`).
    pub fn to_padded(&self) -> String {
        format!("{:06o}", self.raw())
    }

    /// A directory: top digits `04`.
    pub fn is_tree(&self) -> bool {
        self.type_bits() == 0o04
    }

    /// What kind of object an entry with this mode names.
    pub fn object_type(&self) -> Option<ObjectType> {
        match self.type_bits() {
            0o04 => Some(ObjectType::Tree),
            0o10 | 0o12 => Some(ObjectType::Blob),
            0o16 => Some(ObjectType::Commit),
            _ => None,
        }
    }
}

fn parse_octal(s: &[u8]) -> Option<u32> {
    if !(5..=6).contains(&s.len()) {
        return None;
    }
    s.iter().try_fold(0u32, |acc, &b| match b {
        b'0'..=b'7' => Some(acc * 8 + u32::from(b - b'0')),
        _ => None,
    })
}

/// One `(mode, name, id)` row of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    /// Tree order: directories compare as if their name ended in '/'.
    ///
    /// So a directory `foo` sorts after `foo.c` and `foo-bar` but before `foo0`.
    pub fn cmp_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
        sort_key_cmp(&a.name, a.mode.is_tree(), &b.name, b.mode.is_tree())
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::cmp_entries(self, other)
    }
}

/// Compare `name` or `name + "/"` without allocating.
fn sort_key_cmp(a: &[u8], a_dir: bool, b: &[u8], b_dir: bool) -> Ordering {
    let suffix = |dir: bool| if dir { &b"/"[..] } else { &b""[..] };
    a.iter()
        .chain(suffix(a_dir))
        .cmp(b.iter().chain(suffix(b_dir)))
}

/// A directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `mode SP name NUL id[20]` records until the buffer is exhausted.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < content.len() {
            let space = content[pos..]
                .find_byte(b' ')
                .map(|p| p + pos)
                .ok_or_else(|| ObjectError::CorruptTree {
                    offset: pos,
                    reason: "missing space after mode".into(),
                })?;

            let mode = FileMode::from_bytes(&content[pos..space]).map_err(|_| {
                ObjectError::CorruptTree {
                    offset: pos,
                    reason: format!(
                        "mode must be 5 or 6 octal digits, got '{}'",
                        content[pos..space].as_bstr()
                    ),
                }
            })?;

            let name_start = space + 1;
            let nul = content[name_start..]
                .find_byte(0)
                .map(|p| p + name_start)
                .ok_or_else(|| ObjectError::CorruptTree {
                    offset: name_start,
                    reason: "missing NUL after name".into(),
                })?;
            if nul == name_start {
                return Err(ObjectError::CorruptTree {
                    offset: name_start,
                    reason: "empty entry name".into(),
                });
            }

            let oid_start = nul + 1;
            let oid_end = oid_start + OID_LEN;
            if oid_end > content.len() {
                return Err(ObjectError::CorruptTree {
                    offset: oid_start,
                    reason: "truncated object id".into(),
                });
            }

            entries.push(TreeEntry {
                mode,
                name: BString::from(&content[name_start..nul]),
                oid: ObjectId::from_bytes(&content[oid_start..oid_end])?,
            });
            pos = oid_end;
        }

        Ok(Self { entries })
    }

    /// Serialize in tree order, whatever order `entries` is in.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut sorted: Vec<&TreeEntry> = self.entries.iter().collect();
        sorted.sort();

        let mut out = Vec::with_capacity(self.entries.len() * 40);
        for entry in sorted {
            out.extend_from_slice(&entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    pub fn sort(&mut self) {
        self.entries.sort();
    }

    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(n: u8) -> ObjectId {
        ObjectId::from_bytes(&[n; 20]).unwrap()
    }

    #[test]
    fn file_mode_parsing() {
        assert_eq!(FileMode::from_bytes(b"100644").unwrap(), FileMode::Regular);
        assert_eq!(FileMode::from_bytes(b"100755").unwrap(), FileMode::Executable);
        assert_eq!(FileMode::from_bytes(b"120000").unwrap(), FileMode::Symlink);
        assert_eq!(FileMode::from_bytes(b"160000").unwrap(), FileMode::Gitlink);
        assert_eq!(FileMode::from_bytes(b"40000").unwrap(), FileMode::Tree);
        assert_eq!(FileMode::from_bytes(b"040000").unwrap(), FileMode::Tree);
    }

    #[test]
    fn file_mode_width_enforced() {
        assert!(FileMode::from_bytes(b"644").is_err());
        assert!(FileMode::from_bytes(b"1000644").is_err());
        assert!(FileMode::from_bytes(b"10064x").is_err());
    }

    #[test]
    fn mode_kinds() {
        assert_eq!(FileMode::Tree.object_type(), Some(ObjectType::Tree));
        assert_eq!(FileMode::Symlink.object_type(), Some(ObjectType::Blob));
        assert_eq!(FileMode::Gitlink.object_type(), Some(ObjectType::Commit));
        assert_eq!(FileMode::Unknown(0o100664).object_type(), Some(ObjectType::Blob));
        assert_eq!(FileMode::Unknown(0o070000).object_type(), None);
        assert!(FileMode::Unknown(0o040755).is_tree());
    }

    #[test]
    fn mode_from_index_bits() {
        assert_eq!(FileMode::from_type_and_perms(0b1000, 0o644), FileMode::Regular);
        assert_eq!(FileMode::from_type_and_perms(0b1000, 0o755), FileMode::Executable);
        assert_eq!(FileMode::from_type_and_perms(0b1010, 0), FileMode::Symlink);
    }

    #[test]
    fn padded_and_canonical_forms() {
        assert_eq!(FileMode::Tree.as_bytes(), "40000");
        assert_eq!(FileMode::Tree.to_padded(), "040000");
        assert_eq!(FileMode::Regular.to_padded(), "100644");
    }

    #[test]
    fn five_and_six_digit_modes_parse_identically() {
        let mut five = b"40000 src\0".to_vec();
        five.extend_from_slice(oid(1).as_bytes());
        let mut six = b"040000 src\0".to_vec();
        six.extend_from_slice(oid(1).as_bytes());
        assert_eq!(Tree::parse(&five).unwrap(), Tree::parse(&six).unwrap());
    }

    #[test]
    fn parse_serialize_roundtrip() {
        let tree = Tree {
            entries: vec![
                TreeEntry { mode: FileMode::Regular, name: "a.txt".into(), oid: oid(1) },
                TreeEntry { mode: FileMode::Tree, name: "lib".into(), oid: oid(2) },
            ],
        };
        let bytes = tree.serialize_content();
        assert_eq!(Tree::parse(&bytes).unwrap(), tree);
    }

    #[test]
    fn truncated_oid_is_corrupt() {
        let mut data = b"100644 a\0".to_vec();
        data.extend_from_slice(&[7; 10]);
        assert!(matches!(
            Tree::parse(&data),
            Err(ObjectError::CorruptTree { offset: 9, .. })
        ));
    }

    #[test]
    fn missing_delimiters_are_corrupt() {
        assert!(matches!(
            Tree::parse(b"100644"),
            Err(ObjectError::CorruptTree { offset: 0, .. })
        ));
        assert!(matches!(
            Tree::parse(b"100644 name-without-nul"),
            Err(ObjectError::CorruptTree { .. })
        ));
    }

    #[test]
    fn empty_tree() {
        let tree = Tree::parse(b"").unwrap();
        assert!(tree.is_empty());
        assert!(tree.serialize_content().is_empty());
    }

    #[test]
    fn find_by_name() {
        let tree = Tree {
            entries: vec![TreeEntry { mode: FileMode::Regular, name: "x".into(), oid: oid(3) }],
        };
        assert_eq!(tree.find(b"x".as_bstr()).map(|e| e.oid), Some(oid(3)));
        assert!(tree.find(b"y".as_bstr()).is_none());
    }
}
