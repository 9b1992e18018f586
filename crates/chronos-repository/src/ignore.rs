use std::fs;
use std::io;
use std::path::Path;

use bstr::ByteSlice;
use chronos_config::global_ignore_path;
use chronos_index::{IgnoreRules, Index};
use tracing::trace;

use crate::{Repository, Result};

const IGNORE_FILE: &[u8] = b".gitignore";

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Repository {
    /// Collect the ignore rules: `info/exclude` and the global ignore file
    /// apply everywhere, and each `.gitignore` tracked in `index` applies
    /// to its own directory.
    ///
    /// Only staged `.gitignore` content counts, not what is on disk.
    /// `core.ignorecase` makes every pattern case-insensitive.
    pub fn ignore_rules(&self, index: &Index) -> Result<IgnoreRules> {
        let mut rules = IgnoreRules::new();
        rules.set_ignore_case(self.config.get_bool_or("core.ignorecase", false)?);

        if let Some(text) = read_optional(&self.git_dir.join("info").join("exclude"))? {
            rules.add_absolute(&text);
        }
        if let Some(path) = global_ignore_path() {
            if let Some(text) = read_optional(&path)? {
                rules.add_absolute(&text);
            }
        }

        for entry in index.iter() {
            let path = entry.path.as_bytes();
            let dir = if path == IGNORE_FILE {
                Some(&b""[..])
            } else {
                path.strip_suffix(IGNORE_FILE)
                    .and_then(|rest| rest.strip_suffix(b"/"))
            };
            if let Some(dir) = dir {
                trace!(dir = %dir.as_bstr(), "loading scoped ignore rules");
                let blob = self.read_blob(&entry.oid)?;
                rules.add_scoped(dir, &blob.data);
            }
        }
        Ok(rules)
    }
}
