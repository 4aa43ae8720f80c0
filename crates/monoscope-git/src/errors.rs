use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChangeSetError>;

#[derive(Debug, Error)]
pub enum ChangeSetError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not found at path: {path}: {source}")]
    RepoNotFound {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Cannot resolve revision {spec}: {source}")]
    RevisionNotFound {
        spec: String,
        #[source]
        source: git2::Error,
    },

    #[error("Operation not supported in bare repository")]
    BareRepository,

    #[error("Failed to stat path {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Depth must be at least 1")]
    InvalidDepth,
}
