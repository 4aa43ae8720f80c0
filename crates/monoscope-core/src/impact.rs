//! Maps changed directories onto the set of impacted modules

use crate::error::{ResolveError, Result};
use crate::graph::DependencyGraph;
use crate::model::Dependent;
use crate::workspace::{is_module, load_module, WorkspaceIndex};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Resolves impacted modules for directories relative to one repository root.
///
/// Each distinct workspace root is scanned at most once per analyzer.
#[derive(Debug)]
pub struct ImpactAnalyzer {
    root: PathBuf,
    workspaces: HashMap<PathBuf, WorkspaceIndex>,
}

impl ImpactAnalyzer {
    pub fn new(root: impl AsRef<Path>) -> Self {
        ImpactAnalyzer {
            root: root.as_ref().to_path_buf(),
            workspaces: HashMap::new(),
        }
    }

    /// Every module impacted by changes in `changed_dirs`: each changed
    /// module plus its transitive dependents, deduplicated by location in
    /// first-seen order. Directories that are not modules are skipped.
    pub fn impacted(&mut self, changed_dirs: &[PathBuf]) -> Result<Vec<Dependent>> {
        let mut seen = HashSet::new();
        let mut impacted = Vec::new();

        for dir in changed_dirs {
            let abs = self.absolute(dir);
            let is_mod = is_module(&abs).map_err(|source| ResolveError::Io {
                path: abs.clone(),
                source,
            })?;
            if !is_mod {
                debug!("{} is not a module", dir.display());
                continue;
            }

            let dependents = self.dependents_of(dir, true)?;
            match dependents.len().saturating_sub(1) {
                0 => warn!("No dependents found for {}", dir.display()),
                n => info!("Found {} dependents for {}", n, dir.display()),
            }

            for dependent in dependents {
                if seen.insert(dependent.path.clone()) {
                    impacted.push(dependent);
                }
            }
        }
        Ok(impacted)
    }

    /// Dependents of the module at `dir` within its parent workspace.
    ///
    /// The manifest at `dir` must parse; a failure here is fatal.
    pub fn dependents_of(&mut self, dir: &Path, include_self: bool) -> Result<Vec<Dependent>> {
        let abs = self.absolute(dir);
        let target = load_module(&abs)?;

        let workspace_root = match dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => self.root.join(parent),
            None => self.root.clone(),
        };
        let index = match self.workspaces.entry(workspace_root) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let index = WorkspaceIndex::scan(entry.key())?;
                debug!("Scanned {} modules under {}", index.len(), entry.key().display());
                entry.insert(index)
            }
        };

        let dependents = DependencyGraph::build(index).resolve(&target, include_self)?;
        Ok(dependents
            .into_iter()
            .map(|d| Dependent::new(d.name, relative_to(&self.root, &d.path)))
            .collect())
    }

    fn absolute(&self, dir: &Path) -> PathBuf {
        if dir.as_os_str().is_empty() || dir == Path::new(".") {
            self.root.clone()
        } else {
            self.root.join(dir)
        }
    }
}

/// Append `.` to a non-empty change set when `root` is itself a module, so
/// that the root module and its dependents are reported too.
pub fn with_root_module(root: &Path, mut changed_dirs: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    if changed_dirs.is_empty() {
        return Ok(changed_dirs);
    }
    let is_mod = is_module(root).map_err(|source| ResolveError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    let current = Path::new(".");
    if is_mod && !changed_dirs.iter().any(|d| d == current) {
        info!("Workspace root is itself a module");
        changed_dirs.push(current.to_path_buf());
    }
    Ok(changed_dirs)
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}
