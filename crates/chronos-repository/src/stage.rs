//! Staging: `add` and `rm` against the index.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use bstr::{BString, ByteSlice, ByteVec};
use chronos_index::{EntryType, Index, IndexEntry, StatData};
use chronos_object::ObjectType;
use tracing::{debug, trace};

use crate::{RepoError, Repository, Result, DOT_DIR};

/// Resolve `.` and `..` without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    false
}

/// Drop the entries for `relative` and return the paths that had one.
fn unstage(index: &mut Index, relative: Vec<BString>, skip_missing: bool) -> Result<Vec<BString>> {
    if !skip_missing {
        if let Some(missing) = relative.iter().find(|p| !index.contains(p.as_bstr())) {
            return Err(RepoError::NotFound(missing.to_string()));
        }
    }
    Ok(relative
        .into_iter()
        .filter(|p| index.remove(p.as_bstr()))
        .collect())
}

impl Repository {
    /// The worktree-relative, `/`-separated form of `path`.
    ///
    /// Relative paths are taken from the current directory. The final
    /// component is not dereferenced, so symlinks and deleted files work.
    /// Paths outside the worktree or inside the metadata directory fail
    /// with `PathOutsideWorktree`.
    pub fn relative_path(&self, path: &Path) -> Result<BString> {
        let absolute = if path.is_absolute() {
            lexical_normalize(path)
        } else {
            lexical_normalize(&std::env::current_dir()?.join(path))
        };

        let absolute = match (absolute.parent(), absolute.file_name()) {
            (Some(parent), Some(name)) => match fs::canonicalize(parent) {
                Ok(parent) => parent.join(name),
                Err(_) => absolute.clone(),
            },
            _ => absolute.clone(),
        };

        let outside = || RepoError::PathOutsideWorktree(path.to_path_buf());
        let relative = absolute.strip_prefix(&self.work_tree).map_err(|_| outside())?;

        let mut out = BString::default();
        for (i, component) in relative.components().enumerate() {
            let Component::Normal(name) = component else {
                return Err(outside());
            };
            if i == 0 && name == DOT_DIR {
                return Err(outside());
            }
            if i > 0 {
                out.push_byte(b'/');
            }
            out.push_str(Vec::from_os_str_lossy(name));
        }
        Ok(out)
    }

    /// Remove `paths` from the index, and from disk when `delete` is set.
    ///
    /// Every path is checked before anything changes. Paths with no index
    /// entry fail with `NotFound` unless `skip_missing` is set.
    pub fn rm(&self, paths: &[PathBuf], delete: bool, skip_missing: bool) -> Result<Vec<BString>> {
        let relative = paths
            .iter()
            .map(|p| self.relative_path(p))
            .collect::<Result<Vec<_>>>()?;
        let mut index = self.load_index()?;
        let removed = unstage(&mut index, relative, skip_missing)?;

        if delete {
            for path in &removed {
                match fs::remove_file(self.work_tree.join(path.to_path_lossy())) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        self.write_index(&index)?;
        debug!(count = removed.len(), delete, "removed paths from index");
        Ok(removed)
    }

    /// Stage the current content of `paths`.
    ///
    /// Each path must be a regular file or a symlink inside the worktree.
    /// Executable files are staged as `0o755`, everything else as `0o644`.
    pub fn add(&self, paths: &[PathBuf]) -> Result<Vec<BString>> {
        let mut index = self.load_index()?;

        let mut staged = Vec::with_capacity(paths.len());
        for path in paths {
            let relative = self.relative_path(path)?;
            let absolute = self.work_tree.join(relative.to_path_lossy());
            let meta = fs::symlink_metadata(&absolute)
                .map_err(|_| RepoError::NotFound(path.display().to_string()))?;
            if !(meta.is_file() || meta.file_type().is_symlink()) {
                return Err(RepoError::NotAFile(path.to_path_buf()));
            }
            staged.push((relative, absolute, meta));
        }

        unstage(&mut index, staged.iter().map(|(rel, _, _)| rel.clone()).collect(), true)?;

        let mut added = Vec::with_capacity(staged.len());
        for (relative, absolute, meta) in staged {
            let (data, kind, perms) = if meta.file_type().is_symlink() {
                let target = fs::read_link(&absolute)?;
                (Vec::from_path_lossy(&target).into_owned(), EntryType::Symlink, 0)
            } else {
                let perms = if is_executable(&meta) { 0o755 } else { 0o644 };
                (fs::read(&absolute)?, EntryType::Regular, perms)
            };

            let oid = self.store.write_raw(ObjectType::Blob, &data)?;
            let mut entry = IndexEntry::new(relative.clone(), oid, StatData::from_metadata(&meta));
            entry.mode_type = kind;
            entry.mode_perms = perms;
            trace!(path = %relative, %oid, "staged");
            index.add(entry);
            added.push(relative);
        }

        self.write_index(&index)?;
        debug!(count = added.len(), "added paths to index");
        Ok(added)
    }
}
