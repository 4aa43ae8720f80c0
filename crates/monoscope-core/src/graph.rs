//! Reverse dependency resolution over a petgraph `DiGraph`

use crate::error::{ResolveError, Result};
use crate::model::{Dependent, Module};
use crate::workspace::WorkspaceIndex;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Requirement graph of one workspace.
///
/// Nodes are canonical identifiers (workspace modules plus anything they
/// require); an edge `a -> b` means `a` declares `b` as a requirement.
pub struct DependencyGraph<'a> {
    index: &'a WorkspaceIndex,
    inner: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for DependencyGraph<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl<'a> DependencyGraph<'a> {
    pub fn build(index: &'a WorkspaceIndex) -> Self {
        let mut graph = DependencyGraph {
            index,
            inner: DiGraph::new(),
            nodes: HashMap::new(),
        };
        for module in index.modules() {
            let from = graph.node_for(&module.id);
            for requirement in &module.requires {
                let to = graph.node_for(&requirement.path);
                graph.inner.update_edge(from, to, ());
            }
        }
        graph
    }

    fn node_for(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(id) {
            return idx;
        }
        let idx = self.inner.add_node(id.to_string());
        self.nodes.insert(id.to_string(), idx);
        idx
    }

    /// Does `module` directly require `dependency`?
    pub fn depends_on(&self, module: &str, dependency: &str) -> bool {
        match (self.nodes.get(module), self.nodes.get(dependency)) {
            (Some(&from), Some(&to)) => self.inner.contains_edge(from, to),
            _ => false,
        }
    }

    /// Modules declaring a direct requirement on `id`.
    pub fn direct_dependents(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.nodes.get(id) else {
            return Vec::new();
        };
        let mut found: Vec<&str> = self
            .inner
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.inner[n].as_str())
            .collect();
        found.sort_unstable();
        found
    }

    /// Canonical identifiers of every module that reaches `target` through a
    /// non-empty chain of requirements. The target itself is never included.
    ///
    /// Breadth-first over incoming edges; each module is queued at most once,
    /// so cycles terminate.
    pub fn transitive_dependents(&self, target: &str) -> HashSet<&str> {
        let mut found = HashSet::new();
        let Some(&start) = self.nodes.get(target) else {
            return found;
        };

        let mut queued = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for candidate in self.inner.neighbors_directed(current, Direction::Incoming) {
                if candidate == start {
                    continue;
                }
                if found.insert(self.inner[candidate].as_str()) && queued.insert(candidate) {
                    queue.push_back(candidate);
                }
            }
        }
        found
    }

    /// Dependents of `target`, sorted by canonical identifier.
    ///
    /// With `include_self` the target is prepended once, ahead of the sorted
    /// dependents.
    pub fn resolve(&self, target: &Module, include_self: bool) -> Result<Vec<Dependent>> {
        let mut names: Vec<&str> = self.transitive_dependents(&target.id).into_iter().collect();
        names.sort_unstable();
        debug!("{} has {} transitive dependents", target.id, names.len());

        let mut results = Vec::with_capacity(names.len() + usize::from(include_self));
        if include_self {
            results.push(target.to_dependent());
        }
        for name in names {
            let location = self
                .index
                .location_of(name)
                .ok_or_else(|| ResolveError::Integrity(name.to_string()))?;
            results.push(Dependent::new(name, location));
        }
        Ok(results)
    }
}

/// Resolve the dependents of the workspace module `target`.
pub fn resolve_dependents(index: &WorkspaceIndex, target: &str, include_self: bool) -> Result<Vec<Dependent>> {
    let module = index
        .module(target)
        .ok_or_else(|| ResolveError::UnknownModule(target.to_string()))?;
    DependencyGraph::build(index).resolve(module, include_self)
}
