//! Monoscope Core — go.mod reader, workspace scanner, and reverse dependency resolver

pub mod error;
pub mod graph;
pub mod impact;
pub mod manifest;
pub mod model;
pub mod workspace;


#[cfg(test)]
pub mod test_utils;

pub use error::{ManifestError, ResolveError, Result};
pub use graph::{DependencyGraph, resolve_dependents};
pub use impact::{ImpactAnalyzer, with_root_module};
pub use manifest::{MANIFEST_FILE, Manifest, read_manifest};
pub use model::{Dependent, Module, Requirement};
pub use workspace::{WorkspaceIndex, is_module, load_module};
