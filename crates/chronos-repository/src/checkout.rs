//! Materializing a tree into a directory.

use std::fs;
use std::path::Path;

use bstr::ByteSlice;
use chronos_hash::ObjectId;
use chronos_object::{FileMode, ObjectError, ObjectType, TreeEntry};
use tracing::debug;

use crate::{RepoError, Repository, Result};

/// Entry names that would escape or alias the directory being written.
fn check_entry_name(entry: &TreeEntry) -> Result<()> {
    let name = entry.name.as_bytes();
    if name.is_empty() || name == b"." || name == b".." || name.contains(&b'/') {
        return Err(ObjectError::CorruptTree {
            offset: 0,
            reason: format!("unsafe entry name '{}'", entry.name),
        }
        .into());
    }
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn write_symlink(target: &[u8], path: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target.to_path_lossy(), path)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_symlink(target: &[u8], path: &Path) -> Result<()> {
    fs::write(path, target)?;
    Ok(())
}

impl Repository {
    /// Write the tree named by `name` (a tree, or anything that peels to a
    /// commit) into `dest`.
    ///
    /// `dest` is created when missing; an existing `dest` must be an empty
    /// directory. Returns the id of the tree written.
    pub fn checkout(&self, name: &str, dest: &Path) -> Result<ObjectId> {
        let tree = self.resolve(name, Some(ObjectType::Tree), true)?;

        if dest.exists() {
            if !dest.is_dir() {
                return Err(RepoError::NotADirectory(dest.to_path_buf()));
            }
            if fs::read_dir(dest)?.next().is_some() {
                return Err(RepoError::NotEmptyDirectory(dest.to_path_buf()));
            }
        } else {
            fs::create_dir_all(dest)?;
        }

        self.checkout_tree(&tree, dest)?;
        debug!(%tree, dest = %dest.display(), "checked out tree");
        Ok(tree)
    }

    fn checkout_tree(&self, oid: &ObjectId, dest: &Path) -> Result<()> {
        let tree = self.read_tree(oid)?;
        for entry in &tree.entries {
            check_entry_name(entry)?;
            let path = dest.join(entry.name.to_path_lossy());

            match entry.mode {
                FileMode::Tree | FileMode::Unknown(0o040000..=0o047777) => {
                    fs::create_dir(&path)?;
                    self.checkout_tree(&entry.oid, &path)?;
                }
                FileMode::Regular => {
                    fs::write(&path, self.read_blob(&entry.oid)?.data)?;
                }
                FileMode::Executable => {
                    fs::write(&path, self.read_blob(&entry.oid)?.data)?;
                    make_executable(&path)?;
                }
                FileMode::Symlink => {
                    write_symlink(&self.read_blob(&entry.oid)?.data, &path)?;
                }
                // Submodule contents live elsewhere; leave an empty directory.
                FileMode::Gitlink => fs::create_dir(&path)?,
                FileMode::Unknown(0o100000..=0o107777) => {
                    fs::write(&path, self.read_blob(&entry.oid)?.data)?;
                }
                FileMode::Unknown(_) => {
                    return Err(RepoError::UnsupportedMode {
                        name: entry.name.to_string(),
                        mode: entry.mode.to_padded(),
                    })
                }
            }
        }
        Ok(())
    }
}
