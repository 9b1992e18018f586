use std::fs;
use std::io::Write;

use chronos_hash::hasher::Hasher;
use chronos_hash::ObjectId;
use chronos_object::{header, Object, ObjectType};
use flate2::write::ZlibEncoder;
use tracing::{debug, trace};

use crate::{ObjectStore, Result};

impl ObjectStore {
    /// Store an object and return its id. A no-op if it is already present.
    pub fn write(&self, obj: &Object) -> Result<ObjectId> {
        self.write_raw(obj.object_type(), &obj.serialize_content())
    }

    /// Store a payload of a known kind.
    pub fn write_raw(&self, obj_type: ObjectType, payload: &[u8]) -> Result<ObjectId> {
        let hdr = header::write_header(obj_type, payload.len());
        let oid = {
            let mut hasher = Hasher::new();
            hasher.update(&hdr);
            hasher.update(payload);
            hasher.finalize()?
        };

        let final_path = self.object_path(&oid);
        if final_path.is_file() {
            trace!(%oid, "object already stored");
            return Ok(oid);
        }

        let fanout = self.objects_dir.join(&oid.to_hex()[..2]);
        fs::create_dir_all(&fanout)?;

        // Compress into a temp file on the same filesystem, then rename into place.
        let tmp = tempfile::Builder::new().prefix("tmp_obj_").tempfile_in(&self.objects_dir)?;
        let mut encoder = ZlibEncoder::new(tmp, self.compression_level);
        encoder.write_all(&hdr)?;
        encoder.write_all(payload)?;
        let tmp = encoder.finish()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o444))?;
        }

        match tmp.persist_noclobber(&final_path) {
            Ok(_) => debug!(%oid, kind = %obj_type, size = payload.len(), "wrote object"),
            // Another writer stored the same content first.
            Err(_) if final_path.is_file() => trace!(%oid, "lost write race, object present"),
            Err(e) => return Err(e.error.into()),
        }
        Ok(oid)
    }

    /// Hash a payload as `obj_type` without storing it.
    pub fn hash_only(obj_type: ObjectType, payload: &[u8]) -> Result<ObjectId> {
        Ok(Hasher::hash_object(obj_type.as_str(), payload)?)
    }
}
