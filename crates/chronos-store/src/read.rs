use std::fs;
use std::io::Read;

use chronos_hash::ObjectId;
use chronos_object::{header, Object, ObjectType};
use flate2::read::ZlibDecoder;

use crate::{ObjectStore, Result, StoreError};

impl ObjectStore {
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    /// Read and decode an object. A missing object is [`StoreError::NotFound`].
    pub fn read(&self, oid: &ObjectId) -> Result<Object> {
        self.try_read(oid)?.ok_or(StoreError::NotFound(*oid))
    }

    /// Like [`read`](ObjectStore::read) but `Ok(None)` when absent.
    pub fn try_read(&self, oid: &ObjectId) -> Result<Option<Object>> {
        let Some(framed) = self.read_framed(oid)? else {
            return Ok(None);
        };
        Ok(Some(Object::decode(&framed)?))
    }

    /// The kind and payload size, from the header alone.
    pub fn read_header(&self, oid: &ObjectId) -> Result<(ObjectType, usize)> {
        let path = self.object_path(oid);
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*oid))
            }
            Err(e) => return Err(e.into()),
        };

        // Headers are "<kind> <decimal size>\0"; 32 bytes covers any of them.
        let mut head = Vec::with_capacity(32);
        ZlibDecoder::new(file)
            .take(32)
            .read_to_end(&mut head)
            .map_err(|source| StoreError::Decompress { oid: *oid, source })?;
        let (obj_type, size, _) = header::parse_header(&head)?;
        Ok((obj_type, size))
    }

    /// Decompressed framed bytes, `None` if there is no such file.
    fn read_framed(&self, oid: &ObjectId) -> Result<Option<Vec<u8>>> {
        let compressed = match fs::read(self.object_path(oid)) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut framed = Vec::new();
        ZlibDecoder::new(&compressed[..])
            .read_to_end(&mut framed)
            .map_err(|source| StoreError::Decompress { oid: *oid, source })?;
        Ok(Some(framed))
    }
}
