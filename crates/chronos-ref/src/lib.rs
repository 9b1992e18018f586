//! References for chronos: named pointers stored as plain text files under
//! the repository's metadata directory.
//!
//! A ref file holds either `ref: <other-ref>` (symbolic) or a 40-digit hex
//! object id (direct). `HEAD` lives at the metadata root, everything else
//! under `refs/` with `heads/`, `tags/` and `remotes/` namespaces.

mod error;
mod files;
mod name;

pub use error::RefError;
pub use files::FileRefStore;
pub use name::RefName;

use chronos_hash::ObjectId;

/// The parsed content of one ref file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Points straight at an object.
    Direct(ObjectId),
    /// Points at another ref.
    Symbolic(RefName),
}

/// Where `HEAD` currently points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// Attached to a branch, which may not have any commits yet.
    Branch(RefName),
    /// Detached at a commit.
    Detached(ObjectId),
}

pub type Result<T> = std::result::Result<T, RefError>;
