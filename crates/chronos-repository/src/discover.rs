use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{RepoError, Result, DOT_DIR};

/// Walk up from `start` until a directory containing a metadata directory
/// is found. Returns `(work_tree, git_dir)`, both canonical.
pub(crate) fn discover_git_dir(start: &Path) -> Result<(PathBuf, PathBuf)> {
    let start = fs::canonicalize(start)
        .map_err(|_| RepoError::NotARepository(start.to_path_buf()))?;

    let mut current = start.as_path();
    loop {
        let dot_dir = current.join(DOT_DIR);
        if is_git_dir(&dot_dir) {
            debug!(work_tree = %current.display(), "discovered repository");
            return Ok((current.to_path_buf(), dot_dir));
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return Err(RepoError::NotARepository(start)),
        }
    }
}

/// Open the repository rooted exactly at `work_tree`, without walking up.
pub(crate) fn open_work_tree(work_tree: &Path) -> Result<(PathBuf, PathBuf)> {
    let work_tree = fs::canonicalize(work_tree)
        .map_err(|_| RepoError::NotARepository(work_tree.to_path_buf()))?;
    let dot_dir = work_tree.join(DOT_DIR);
    if !is_git_dir(&dot_dir) {
        return Err(RepoError::NotARepository(work_tree));
    }
    Ok((work_tree, dot_dir))
}

/// A metadata directory has at least `HEAD` and `objects/`.
pub(crate) fn is_git_dir(path: &Path) -> bool {
    path.is_dir() && path.join("HEAD").is_file() && path.join("objects").is_dir()
}
