use std::path::PathBuf;

/// Base error type for chronos-utils operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("date parse error: {0}")]
    DateParse(String),

    #[error("malformed identity '{0}': expected 'Name <email>'")]
    Identity(String),

    #[error("unable to replace '{path}': {source}")]
    Replace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
