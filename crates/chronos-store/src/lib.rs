//! Write-once, content-addressed object storage.
//!
//! Each object lives at `objects/XX/YYYY...` where `XX` is the first two hex
//! digits of its id and `YYYY...` the remaining 38. The file holds the
//! zlib-compressed framed object `"<kind> <size>\0<payload>"`. Writing an
//! object that already exists is a no-op, so repeated or concurrent writes of
//! the same content are safe.

mod prefix;
mod read;
mod write;

pub use prefix::MINIMUM_ABBREV;

use std::path::{Path, PathBuf};

use chronos_hash::ObjectId;

/// The objects directory of one repository.
pub struct ObjectStore {
    objects_dir: PathBuf,
    compression_level: flate2::Compression,
}

impl ObjectStore {
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            compression_level: flate2::Compression::default(),
        }
    }

    /// Set the zlib compression level (0-9).
    pub fn set_compression_level(&mut self, level: u32) {
        self.compression_level = flate2::Compression::new(level);
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Where the object with `oid` is (or would be) stored.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.objects_dir.join(oid.loose_path())
    }
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    #[error("corrupt object {oid}: {reason}")]
    Corrupt { oid: ObjectId, reason: String },

    #[error("decompression error for {oid}: {source}")]
    Decompress {
        oid: ObjectId,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Object(#[from] chronos_object::ObjectError),

    #[error(transparent)]
    Hash(#[from] chronos_hash::HashError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_splits_fanout() {
        let store = ObjectStore::open("/tmp/objects");
        let oid = ObjectId::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        assert_eq!(
            store.object_path(&oid),
            PathBuf::from("/tmp/objects/da/39a3ee5e6b4b0d3255bfef95601890afd80709")
        );
    }
}
