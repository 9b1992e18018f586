use std::path::PathBuf;

use chronos_hash::ObjectId;
use chronos_object::ObjectType;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a chronos repository (or any of the parent directories): {0}")]
    NotARepository(PathBuf),

    #[error("no such reference or object: {0}")]
    NotFound(String),

    #[error("ambiguous reference {name}: candidates are {}", format_candidates(.candidates))]
    AmbiguousReference {
        name: String,
        candidates: Vec<ObjectId>,
    },

    #[error("{name} is a {actual}, not a {expected}")]
    WrongObjectType {
        name: String,
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("'{0}' is outside the working tree")]
    PathOutsideWorktree(PathBuf),

    #[error("'{0}' is not a regular file")]
    NotAFile(PathBuf),

    #[error("destination '{0}' is not empty")]
    NotEmptyDirectory(PathBuf),

    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("repository already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("tag '{0}' already exists")]
    TagExists(String),

    #[error("unsupported repositoryformatversion {0}")]
    UnsupportedFormatVersion(i64),

    #[error("author identity unknown: set user.name and user.email")]
    MissingIdentity,

    #[error("tree entry '{name}' has unsupported mode {mode}")]
    UnsupportedMode { name: String, mode: String },

    #[error(transparent)]
    Config(#[from] chronos_config::ConfigError),

    #[error(transparent)]
    Store(#[from] chronos_store::StoreError),

    #[error(transparent)]
    Object(#[from] chronos_object::ObjectError),

    #[error(transparent)]
    Ref(#[from] chronos_ref::RefError),

    #[error(transparent)]
    Index(#[from] chronos_index::IndexError),

    #[error(transparent)]
    Util(#[from] chronos_utils::UtilError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_candidates(candidates: &[ObjectId]) -> String {
    candidates
        .iter()
        .map(|oid| oid.to_hex())
        .collect::<Vec<_>>()
        .join(", ")
}
