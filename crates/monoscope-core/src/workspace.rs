//! Workspace/monorepo scanning

use crate::error::{ResolveError, Result};
use crate::manifest::{read_manifest, MANIFEST_FILE};
use crate::model::Module;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Does `dir` hold a manifest that is a regular file?
///
/// A missing manifest, or a directory that happens to carry the manifest's
/// name, means "not a module". Any other stat failure is returned.
pub fn is_module(dir: &Path) -> io::Result<bool> {
    match std::fs::metadata(dir.join(MANIFEST_FILE)) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Load the module rooted at `dir`.
pub fn load_module(dir: &Path) -> Result<Module> {
    let path = dir.join(MANIFEST_FILE);
    let manifest = read_manifest(&path).map_err(|source| ResolveError::Parse { path, source })?;
    Ok(Module {
        id: manifest.module,
        location: dir.to_path_buf(),
        requires: manifest.requires,
    })
}

/// Bidirectional index between module directories and canonical identifiers
/// for the immediate children of one workspace root.
///
/// Built once and read-only afterwards. Iteration order is unspecified.
#[derive(Debug, Clone)]
pub struct WorkspaceIndex {
    root: PathBuf,
    by_location: HashMap<PathBuf, String>,
    by_id: HashMap<String, Module>,
}

impl WorkspaceIndex {
    /// Scan the immediate child directories of `root` for modules.
    ///
    /// Only one level is inspected; nested modules are not discovered.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let scan_err = |source| ResolveError::Scan {
            path: root.to_path_buf(),
            source,
        };

        let mut index = WorkspaceIndex {
            root: root.to_path_buf(),
            by_location: HashMap::new(),
            by_id: HashMap::new(),
        };

        for entry in std::fs::read_dir(root).map_err(scan_err)? {
            let entry = entry.map_err(scan_err)?;
            if !entry.file_type().map_err(scan_err)?.is_dir() {
                continue;
            }
            let dir = root.join(entry.file_name());

            match is_module(&dir) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    warn!("Cannot inspect {}: {}", dir.display(), e);
                    continue;
                }
            }

            let module = match load_module(&dir) {
                Ok(module) => module,
                Err(e) => {
                    warn!("Skipping {}: {}", dir.display(), e);
                    continue;
                }
            };
            debug!("Found module {} at {}", module.id, dir.display());
            index.insert(module)?;
        }

        if index.by_id.is_empty() {
            return Err(ResolveError::EmptyWorkspace(root.to_path_buf()));
        }
        Ok(index)
    }

    /// Build an index from already loaded modules.
    pub fn from_modules(root: impl AsRef<Path>, modules: impl IntoIterator<Item = Module>) -> Result<Self> {
        let mut index = WorkspaceIndex {
            root: root.as_ref().to_path_buf(),
            by_location: HashMap::new(),
            by_id: HashMap::new(),
        };
        for module in modules {
            index.insert(module)?;
        }
        if index.by_id.is_empty() {
            return Err(ResolveError::EmptyWorkspace(index.root));
        }
        Ok(index)
    }

    fn insert(&mut self, module: Module) -> Result<()> {
        if let Some(existing) = self.by_id.get(&module.id) {
            return Err(ResolveError::DuplicateModule {
                module: module.id.clone(),
                first: existing.location.clone(),
                second: module.location,
            });
        }
        self.by_location.insert(module.location.clone(), module.id.clone());
        self.by_id.insert(module.id.clone(), module);
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the module declaring `id`.
    pub fn location_of(&self, id: &str) -> Option<&Path> {
        self.by_id.get(id).map(|m| m.location.as_path())
    }

    /// Canonical identifier of the module at `location`.
    pub fn id_at(&self, location: &Path) -> Option<&str> {
        self.by_location.get(location).map(String::as_str)
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.by_id.get(id)
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
