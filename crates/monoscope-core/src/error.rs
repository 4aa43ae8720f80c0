use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Failure to read or parse a single manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("no module directive")]
    MissingModule,
}

impl ManifestError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        ManifestError::Syntax {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("parsing manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    #[error("reading workspace root {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no modules found in workspace root {0}")]
    EmptyWorkspace(PathBuf),

    #[error("module {module} is declared by both {first} and {second}")]
    DuplicateModule {
        module: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("could not find module directory for canonical path {0}")]
    Integrity(String),

    #[error("module {0} is not part of the workspace")]
    UnknownModule(String),

    #[error("inspecting {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Zero modules were found. Callers decide whether that is fatal.
    pub fn is_empty_workspace(&self) -> bool {
        matches!(self, ResolveError::EmptyWorkspace(_))
    }
}
