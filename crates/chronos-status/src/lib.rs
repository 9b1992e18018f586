//! Status: how HEAD, the index and the working tree differ.
//!
//! Three independent comparisons, always evaluated in this order:
//! where HEAD points, HEAD's tree against the index ("to be committed"),
//! and the index against the files on disk ("not staged" plus untracked).

mod staged;
mod worktree;

use std::fmt;

use bstr::BString;
use chronos_ref::Head;
use chronos_repository::Repository;

pub use staged::head_vs_index;
pub use worktree::{index_vs_worktree, WorktreeStatus};

/// Errors from computing status.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error(transparent)]
    Repo(#[from] chronos_repository::RepoError),

    #[error(transparent)]
    Store(#[from] chronos_store::StoreError),

    #[error(transparent)]
    Index(#[from] chronos_index::IndexError),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatusError>;

/// How a path differs between two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl ChangeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One classified path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    pub path: BString,
}

impl Change {
    pub(crate) fn new(kind: ChangeKind, path: impl Into<BString>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// The full status report.
#[derive(Debug, Clone)]
pub struct Status {
    pub head: Head,
    /// HEAD against the index.
    pub staged: Vec<Change>,
    /// Index against the working tree.
    pub unstaged: Vec<Change>,
    /// Working tree files neither tracked nor ignored.
    pub untracked: Vec<BString>,
}

/// Compute the full status of `repo`.
pub fn status(repo: &Repository) -> Result<Status> {
    let head = repo.head()?;
    let index = repo.load_index()?;
    let staged = head_vs_index(repo, &index)?;
    let rules = repo.ignore_rules(&index)?;
    let WorktreeStatus {
        changes: unstaged,
        untracked,
    } = index_vs_worktree(repo, &index, &rules)?;

    Ok(Status {
        head,
        staged,
        unstaged,
        untracked,
    })
}
