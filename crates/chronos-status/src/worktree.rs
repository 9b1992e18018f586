use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use bstr::{BString, ByteSlice, ByteVec};
use chronos_index::{IgnoreRules, Index, IndexEntry, Stage, StatData};
use chronos_object::ObjectType;
use chronos_repository::Repository;
use chronos_store::ObjectStore;
use tracing::trace;
use walkdir::WalkDir;

use crate::{Change, ChangeKind, Result};

/// Index against working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    /// Tracked paths deleted or modified on disk.
    pub changes: Vec<Change>,
    /// Files on disk with no index entry and no ignore rule.
    pub untracked: Vec<BString>,
}

/// Every file below `root` as a `/`-separated relative path, skipping the
/// metadata directory.
fn collect_files(root: &Path, git_dir: &Path) -> Result<BTreeSet<BString>> {
    let mut files = BTreeSet::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.path() != git_dir);

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let mut path = BString::default();
        for (i, component) in relative.components().enumerate() {
            if i > 0 {
                path.push_byte(b'/');
            }
            path.push_str(Vec::from_os_str_lossy(component.as_os_str()));
        }
        files.insert(path);
    }
    Ok(files)
}

/// Content of `path` as it would be stored: the link target for symlinks.
fn worktree_content(path: &Path, meta: &fs::Metadata) -> Result<Vec<u8>> {
    if meta.file_type().is_symlink() {
        Ok(Vec::from_path_lossy(&fs::read_link(path)?).into_owned())
    } else {
        Ok(fs::read(path)?)
    }
}

/// Whether the file behind `entry` differs from what was staged.
///
/// Matching ctime, mtime and size short-circuit the content hash; on any
/// mismatch the file is rehashed and only a different id counts.
fn is_modified(entry: &IndexEntry, path: &Path, meta: &fs::Metadata) -> Result<bool> {
    let current = StatData::from_metadata(meta);
    if entry.stat.same_times(&current) && entry.stat.size == current.size {
        trace!(path = %entry.path, "stat unchanged");
        return Ok(false);
    }
    let oid = ObjectStore::hash_only(ObjectType::Blob, &worktree_content(path, meta)?)?;
    trace!(path = %entry.path, staged = %entry.oid, %oid, "rehashed");
    Ok(oid != entry.oid)
}

fn parent_is_dir(path: &Path) -> bool {
    path.parent().is_some_and(Path::is_dir)
}

/// Changes between `index` and the files on disk, plus untracked files
/// that `rules` does not ignore. Both lists are sorted by path.
pub fn index_vs_worktree(
    repo: &Repository,
    index: &Index,
    rules: &IgnoreRules,
) -> Result<WorktreeStatus> {
    let root = repo.work_tree();
    let mut files = collect_files(root, repo.git_dir())?;

    let mut changes = Vec::new();
    for entry in index.iter().filter(|e| e.stage == Stage::Normal) {
        let path = root.join(entry.path.to_path_lossy());
        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => {
                changes.push(Change::new(ChangeKind::Deleted, entry.path.clone()));
            }
            Ok(meta) => {
                if is_modified(entry, &path, &meta)? {
                    changes.push(Change::new(ChangeKind::Modified, entry.path.clone()));
                }
            }
            // A parent replaced by a file fails with ENOTDIR rather than NotFound.
            Err(e) if e.kind() == io::ErrorKind::NotFound || !parent_is_dir(&path) => {
                changes.push(Change::new(ChangeKind::Deleted, entry.path.clone()));
            }
            Err(e) => return Err(e.into()),
        }
        files.remove(&entry.path);
    }

    let mut untracked = Vec::new();
    for path in files {
        if !rules.is_ignored(path.as_bstr())? {
            untracked.push(path);
        }
    }

    Ok(WorktreeStatus { changes, untracked })
}
