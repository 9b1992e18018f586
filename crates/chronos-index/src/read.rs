//! Index file reading (version 2).

use bstr::BString;
use chronos_hash::hasher::Hasher;
use chronos_hash::{ObjectId, OID_LEN};
use tracing::trace;

use crate::entry::{EntryType, IndexEntry, StatData};
use crate::{Index, IndexError, Result, Stage, INDEX_VERSION};

/// Magic bytes at the start of every index file.
pub(crate) const INDEX_SIGNATURE: &[u8; 4] = b"DIRC";

const HEADER_LEN: usize = 12;

/// Fixed part of an entry: stat data (40), id (20), flags (2).
pub(crate) const ENTRY_PREFIX_LEN: usize = 62;

/// Name lengths at or above this are stored as the sentinel and the name
/// is found by its NUL terminator instead.
pub(crate) const NAME_LEN_SENTINEL: usize = 0xFFF;

const FLAG_ASSUME_VALID: u16 = 0x8000;
const FLAG_EXTENDED: u16 = 0x4000;

/// Parse an index file from raw bytes.
pub(crate) fn parse_index(data: &[u8]) -> Result<Index> {
    if data.len() < HEADER_LEN {
        return Err(corrupt(0, "index file too short"));
    }
    if &data[..4] != INDEX_SIGNATURE {
        return Err(corrupt(0, format!("bad signature {:?}", &data[..4])));
    }
    let version = read_u32(data, 4);
    if version != INDEX_VERSION {
        return Err(IndexError::UnsupportedVersion(version));
    }
    let count = read_u32(data, 8) as usize;

    // Records are 8-byte aligned relative to the start of the entries region.
    let body = &data[HEADER_LEN..];
    let mut cursor = 0;
    let mut entries = Vec::with_capacity(count.min(body.len() / ENTRY_PREFIX_LEN));
    for _ in 0..count {
        let (entry, next) = parse_entry(body, cursor)?;
        entries.push(entry);
        cursor = next;
    }

    verify_trailer(data, HEADER_LEN + cursor)?;
    Ok(Index::from_parts(version, entries))
}

fn parse_entry(body: &[u8], start: usize) -> Result<(IndexEntry, usize)> {
    let offset = HEADER_LEN + start;
    if start + ENTRY_PREFIX_LEN > body.len() {
        return Err(corrupt(offset, "truncated entry"));
    }
    let rec = &body[start..];

    let stat = StatData {
        ctime_secs: read_u32(rec, 0),
        ctime_nsecs: read_u32(rec, 4),
        mtime_secs: read_u32(rec, 8),
        mtime_nsecs: read_u32(rec, 12),
        dev: read_u32(rec, 16),
        ino: read_u32(rec, 20),
        uid: read_u32(rec, 28),
        gid: read_u32(rec, 32),
        size: read_u32(rec, 36),
    };

    if read_u16(rec, 24) != 0 {
        return Err(corrupt(offset, "nonzero reserved mode bits"));
    }
    let mode = read_u16(rec, 26);
    let mode_type = EntryType::from_bits(mode >> 12)
        .ok_or_else(|| corrupt(offset, format!("invalid entry type {:04b}", mode >> 12)))?;
    let mode_perms = mode & 0x0FFF;

    let oid = ObjectId::from_bytes(&rec[40..40 + OID_LEN])?;

    let flags = read_u16(rec, 60);
    if flags & FLAG_EXTENDED != 0 {
        return Err(corrupt(offset, "extended flag set in a version 2 index"));
    }
    let assume_valid = flags & FLAG_ASSUME_VALID != 0;
    let stage = Stage::from_bits(flags >> 12);
    let name_len = (flags & 0x0FFF) as usize;

    let name_start = start + ENTRY_PREFIX_LEN;
    let name_end = if name_len < NAME_LEN_SENTINEL {
        let end = name_start + name_len;
        if end >= body.len() || body[end] != 0 {
            return Err(corrupt(offset, "name is not NUL-terminated"));
        }
        end
    } else {
        body[name_start..]
            .iter()
            .position(|&b| b == 0)
            .map(|p| name_start + p)
            .ok_or_else(|| corrupt(offset, "unterminated long name"))?
    };
    let path = BString::from(&body[name_start..name_end]);

    // Past the NUL, then up to the next multiple of 8.
    let next = (name_end + 1).next_multiple_of(8);
    if next > body.len() {
        return Err(corrupt(offset, "truncated entry padding"));
    }
    trace!(path = %path, "read index entry");

    let entry = IndexEntry {
        path,
        oid,
        mode_type,
        mode_perms,
        stage,
        stat,
        assume_valid,
    };
    Ok((entry, next))
}

/// Check what follows the last entry: nothing, or a SHA-1 over everything
/// before it (possibly preceded by extension data, which is skipped).
fn verify_trailer(data: &[u8], end_of_entries: usize) -> Result<()> {
    let rest = data.len() - end_of_entries;
    if rest == 0 {
        return Ok(());
    }
    if rest < OID_LEN {
        return Err(corrupt(end_of_entries, "trailing garbage after entries"));
    }
    let split = data.len() - OID_LEN;
    if rest > OID_LEN {
        trace!(bytes = rest - OID_LEN, "skipping index extensions");
    }
    let computed = Hasher::digest(&data[..split])?;
    if computed.as_bytes() != &data[split..] {
        return Err(IndexError::ChecksumMismatch);
    }
    Ok(())
}

fn corrupt(offset: usize, reason: impl Into<String>) -> IndexError {
    IndexError::Corrupt {
        offset,
        reason: reason.into(),
    }
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([data[at], data[at + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(version: u32, count: u32) -> Vec<u8> {
        let mut buf = INDEX_SIGNATURE.to_vec();
        buf.extend_from_slice(&version.to_be_bytes());
        buf.extend_from_slice(&count.to_be_bytes());
        buf
    }

    #[test]
    fn empty_index_without_checksum() {
        let index = parse_index(&header(2, 0)).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn bad_magic() {
        let mut data = header(2, 0);
        data[0] = b'X';
        assert!(matches!(parse_index(&data), Err(IndexError::Corrupt { .. })));
    }

    #[test]
    fn unsupported_versions() {
        for v in [1, 3, 4] {
            assert!(matches!(
                parse_index(&header(v, 0)),
                Err(IndexError::UnsupportedVersion(n)) if n == v
            ));
        }
    }

    #[test]
    fn truncated_entry() {
        let mut data = header(2, 1);
        data.extend_from_slice(&[0u8; 30]);
        assert!(matches!(parse_index(&data), Err(IndexError::Corrupt { .. })));
    }

    #[test]
    fn bad_checksum() {
        let mut data = header(2, 0);
        data.extend_from_slice(&[0xAB; 20]);
        assert!(matches!(parse_index(&data), Err(IndexError::ChecksumMismatch)));
    }

    #[test]
    fn short_trailer_is_corrupt() {
        let mut data = header(2, 0);
        data.extend_from_slice(&[0; 5]);
        assert!(matches!(parse_index(&data), Err(IndexError::Corrupt { .. })));
    }
}
