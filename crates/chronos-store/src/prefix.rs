//! Abbreviated object id lookup.

use std::fs;
use std::path::Path;

use chronos_hash::hex::is_hex_prefix;
use chronos_hash::{ObjectId, OID_HEX_LEN};
use tracing::trace;

use crate::{ObjectStore, Result};

/// Shortest hex string treated as an abbreviated id.
pub const MINIMUM_ABBREV: usize = 4;

/// Ids in one fan-out directory whose remaining digits start with `rest`.
fn scan_fanout(fanout: &str, dir: &Path, rest: &str) -> Result<Vec<ObjectId>> {
    let mut found = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(found),
        Err(e) => return Err(e.into()),
    };
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
        if !name.starts_with(rest) || !entry.file_type()?.is_file() {
            continue;
        }
        if let Ok(oid) = ObjectId::from_hex(&format!("{fanout}{name}")) {
            found.push(oid);
        }
    }
    found.sort();
    Ok(found)
}

impl ObjectStore {
    /// Every stored id whose hex form starts with `prefix`.
    ///
    /// Only the fan-out directory named by the first two digits is scanned.
    /// Returns an empty list when `prefix` is not 4-40 hex digits. More than
    /// one result means the prefix is ambiguous; rejecting that is up to the
    /// caller.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        if !is_hex_prefix(prefix, MINIMUM_ABBREV, OID_HEX_LEN) {
            return Ok(Vec::new());
        }
        let prefix = prefix.to_ascii_lowercase();
        let (fanout, rest) = prefix.split_at(2);
        let found = scan_fanout(fanout, &self.objects_dir.join(fanout), rest)?;
        trace!(%prefix, candidates = found.len(), "prefix scan");
        Ok(found)
    }
}
