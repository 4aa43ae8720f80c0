//! Core data structures for the module graph

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A single `require` entry of a manifest.
///
/// Only `path` takes part in dependency checks. The version is carried so it
/// can be reported, but it is never evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub path: String,
    pub version: String,
    /// Marked `// indirect` in the manifest.
    pub indirect: bool,
}

/// A module as discovered by one workspace scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Canonical identifier declared by the module's own manifest.
    pub id: String,
    /// Directory holding the manifest.
    pub location: PathBuf,
    pub requires: Vec<Requirement>,
}

impl Module {
    /// Direct dependency check: does this module declare `id` as a requirement?
    pub fn requires(&self, id: &str) -> bool {
        self.requires.iter().any(|r| r.path == id)
    }

    /// Build the record reported for this module.
    pub fn to_dependent(&self) -> Dependent {
        Dependent::new(&self.id, &self.location)
    }
}

/// A module found to depend (directly or transitively) on a target module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependent {
    /// Canonical identifier.
    pub name: String,
    /// Module directory.
    pub path: PathBuf,
}

impl Dependent {
    pub fn new(name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Dependent {
            name: name.into(),
            path: path.as_ref().to_path_buf(),
        }
    }
}
