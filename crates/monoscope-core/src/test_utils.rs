//! Test utilities for Monoscope

use crate::manifest::MANIFEST_FILE;
use crate::model::{Module, Requirement};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Canonical identifier used for the fixture module in directory `dir`.
pub fn module_id(dir: &str) -> String {
    format!("example.com/mono/{dir}")
}

/// Write `dir/go.mod` declaring `module_id(dir)` and requiring `module_id(r)`
/// for every `r` in `requires`.
pub fn write_module(root: &Path, dir: &str, requires: &[&str]) {
    let mut content = format!("module {}\n\ngo 1.22\n", module_id(dir));
    if !requires.is_empty() {
        content.push_str("\nrequire (\n");
        for r in requires {
            content.push_str(&format!("\t{} v0.0.0\n", module_id(r)));
        }
        content.push_str(")\n");
    }
    fs::create_dir_all(root.join(dir)).unwrap();
    fs::write(root.join(dir).join(MANIFEST_FILE), content).unwrap();
}

/// Create a temporary workspace from `(dir, requires)` pairs.
pub fn create_workspace(modules: &[(&str, &[&str])]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (dir, requires) in modules {
        write_module(temp_dir.path(), dir, requires);
    }
    temp_dir
}

/// In-memory module, for building indexes without touching disk.
pub fn module(dir: &str, requires: &[&str]) -> Module {
    Module {
        id: module_id(dir),
        location: PathBuf::from(dir),
        requires: requires
            .iter()
            .map(|r| Requirement {
                path: module_id(r),
                version: "v0.0.0".to_string(),
                indirect: false,
            })
            .collect(),
    }
}
