use super::{Component, ComponentKey, GraphWarning};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::{BTreeMap, BTreeSet};

/// DependencyGraph aggregate: an arena of components addressed by their
/// canonical key plus a separate set of directed edges.
///
/// Every edge endpoint is a component of the graph; `add_edge` refuses
/// anything else.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    components: BTreeMap<ComponentKey, Component>,
    edges: BTreeMap<ComponentKey, BTreeSet<ComponentKey>>,
    roots: Vec<ComponentKey>,
    warnings: Vec<GraphWarning>,
}

/// Owned contents of a graph, used when merging graphs
#[derive(Debug)]
pub struct GraphParts {
    pub components: Vec<Component>,
    pub edges: Vec<(ComponentKey, ComponentKey)>,
    pub roots: Vec<ComponentKey>,
    pub warnings: Vec<GraphWarning>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a component unless one with the same key exists.
    /// Returns true when the component was inserted.
    pub fn insert_component(&mut self, component: Component) -> bool {
        if self.components.contains_key(component.key()) {
            return false;
        }
        self.components.insert(component.key().clone(), component);
        true
    }

    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.components.contains_key(key)
    }

    pub fn component(&self, key: &ComponentKey) -> Option<&Component> {
        self.components.get(key)
    }

    pub fn component_mut(&mut self, key: &ComponentKey) -> Option<&mut Component> {
        self.components.get_mut(key)
    }

    /// Components in canonical key order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Components in canonical key order, for in-place metadata changes
    pub fn components_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        self.components.values_mut()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Records `parent -> child`. Returns false if the edge already existed.
    ///
    /// # Errors
    /// Returns `SbomError::DanglingEdge` if either endpoint is unknown.
    pub fn add_edge(&mut self, parent: &ComponentKey, child: &ComponentKey) -> Result<bool> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(SbomError::DanglingEdge {
                parent: parent.to_string(),
                child: child.to_string(),
            }
            .into());
        }
        Ok(self
            .edges
            .entry(parent.clone())
            .or_default()
            .insert(child.clone()))
    }

    pub fn children(&self, parent: &ComponentKey) -> impl Iterator<Item = &ComponentKey> {
        self.edges.get(parent).into_iter().flatten()
    }

    pub fn has_edge(&self, parent: &ComponentKey, child: &ComponentKey) -> bool {
        self.edges
            .get(parent)
            .is_some_and(|children| children.contains(child))
    }

    /// All edges, grouped by parent in canonical order
    pub fn edges(&self) -> impl Iterator<Item = (&ComponentKey, &ComponentKey)> {
        self.edges
            .iter()
            .flat_map(|(parent, children)| children.iter().map(move |child| (parent, child)))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|children| children.len()).sum()
    }

    /// Drops every edge for which `keep` returns false.
    pub fn retain_edges<F>(&mut self, mut keep: F)
    where
        F: FnMut(&ComponentKey, &ComponentKey) -> bool,
    {
        for (parent, children) in self.edges.iter_mut() {
            children.retain(|child| keep(parent, child));
        }
        self.edges.retain(|_, children| !children.is_empty());
    }

    /// Returns a directed cycle if the graph has one, as the path of keys
    /// from the first repeated component back to itself.
    pub fn find_cycle(&self) -> Option<Vec<ComponentKey>> {
        let mut finished: BTreeSet<&ComponentKey> = BTreeSet::new();

        for start in self.components.keys() {
            if finished.contains(start) {
                continue;
            }
            let mut path = vec![start];
            let mut on_path = BTreeSet::from([start]);
            let mut stack = vec![self.children(start)];

            while let Some(children) = stack.last_mut() {
                match children.next() {
                    Some(child) if on_path.contains(child) => {
                        let from = path.iter().position(|k| *k == child).unwrap_or(0);
                        let mut cycle: Vec<ComponentKey> =
                            path[from..].iter().map(|k| (*k).clone()).collect();
                        cycle.push(child.clone());
                        return Some(cycle);
                    }
                    Some(child) if finished.contains(child) => {}
                    Some(child) => {
                        path.push(child);
                        on_path.insert(child);
                        stack.push(self.children(child));
                    }
                    None => {
                        stack.pop();
                        if let Some(done) = path.pop() {
                            on_path.remove(done);
                            finished.insert(done);
                        }
                    }
                }
            }
        }
        None
    }

    /// True when `to` is reachable from `from` over one or more edges.
    pub fn reaches(&self, from: &ComponentKey, to: &ComponentKey) -> bool {
        let mut seen: BTreeSet<&ComponentKey> = BTreeSet::new();
        let mut pending: Vec<&ComponentKey> = self.children(from).collect();
        while let Some(key) = pending.pop() {
            if key == to {
                return true;
            }
            if seen.insert(key) {
                pending.extend(self.children(key));
            }
        }
        false
    }

    /// Registers a module root. The component must already be in the graph.
    pub fn add_root(&mut self, key: ComponentKey) -> Result<()> {
        if !self.contains(&key) {
            anyhow::bail!("Module root {} is not a component of the graph", key);
        }
        if !self.roots.contains(&key) {
            self.roots.push(key);
        }
        Ok(())
    }

    /// Module roots in module order
    pub fn roots(&self) -> &[ComponentKey] {
        &self.roots
    }

    pub fn push_warning(&mut self, warning: GraphWarning) {
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    pub fn into_parts(self) -> GraphParts {
        let edges = self
            .edges
            .into_iter()
            .flat_map(|(parent, children)| {
                children
                    .into_iter()
                    .map(move |child| (parent.clone(), child))
            })
            .collect();
        GraphParts {
            components: self.components.into_values().collect(),
            edges,
            roots: self.roots,
            warnings: self.warnings,
        }
    }
}
