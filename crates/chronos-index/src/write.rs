//! Index file writing.

use std::io::Write;
use std::path::Path;

use chronos_hash::hasher::Hasher;
use chronos_utils::atomic::AtomicFile;

use crate::entry::IndexEntry;
use crate::read::{INDEX_SIGNATURE, NAME_LEN_SENTINEL};
use crate::{Index, Result};

/// Replace the index file in one rename.
pub(crate) fn write_index(index: &Index, path: &Path) -> Result<()> {
    let data = serialize_index(index)?;
    let mut file = AtomicFile::create(path)?;
    file.write_all(&data)?;
    file.commit()?;
    Ok(())
}

/// Serialize the index: header, entries, trailing SHA-1.
pub(crate) fn serialize_index(index: &Index) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.extend_from_slice(INDEX_SIGNATURE);
    buf.extend_from_slice(&index.version().to_be_bytes());
    buf.extend_from_slice(&(index.len() as u32).to_be_bytes());

    let entries_start = buf.len();
    for entry in index.iter() {
        write_entry(&mut buf, entries_start, entry);
    }

    let checksum = Hasher::digest(&buf)?;
    buf.extend_from_slice(checksum.as_bytes());
    Ok(buf)
}

fn write_entry(buf: &mut Vec<u8>, entries_start: usize, entry: &IndexEntry) {
    let stat = &entry.stat;
    for field in [
        stat.ctime_secs,
        stat.ctime_nsecs,
        stat.mtime_secs,
        stat.mtime_nsecs,
        stat.dev,
        stat.ino,
    ] {
        buf.extend_from_slice(&field.to_be_bytes());
    }
    // 16 reserved bits, then type and permissions.
    buf.extend_from_slice(&0u16.to_be_bytes());
    buf.extend_from_slice(&entry.mode_bits().to_be_bytes());
    for field in [stat.uid, stat.gid, stat.size] {
        buf.extend_from_slice(&field.to_be_bytes());
    }
    buf.extend_from_slice(entry.oid.as_bytes());

    let mut flags = entry.path.len().min(NAME_LEN_SENTINEL) as u16;
    flags |= u16::from(entry.stage.as_u8()) << 12;
    if entry.assume_valid {
        flags |= 0x8000;
    }
    buf.extend_from_slice(&flags.to_be_bytes());

    buf.extend_from_slice(&entry.path);
    buf.push(0);
    let written = buf.len() - entries_start;
    buf.resize(entries_start + written.next_multiple_of(8), 0);
}
