use super::metadata_enricher::MetadataEnricher;
use crate::sbom_generation::domain::{Component, ComponentKey, DependencyGraph};
use crate::shared::error::SbomError;
use crate::shared::Result;

/// GraphAggregator merges per-module graphs into one global graph.
///
/// Components with the same key collapse into one node carrying the union
/// of their metadata; edge sets and module roots are unioned. Graphs are
/// folded in the order given, so callers pass them in module order.
pub struct GraphAggregator;

/// Result of folding module graphs together
#[derive(Debug)]
pub struct Aggregate {
    pub graph: DependencyGraph,
    /// Modules left out because their edges would close a cycle
    pub rejected: Vec<RejectedModule>,
}

#[derive(Debug)]
pub struct RejectedModule {
    pub module: String,
    pub error: SbomError,
}

impl GraphAggregator {
    /// Folds `(module name, graph)` pairs into one graph.
    ///
    /// Each module graph is acyclic on its own, but two modules can
    /// disagree on the direction of an edge. A module whose contribution
    /// closes a cycle is rejected and the aggregate is left as it was
    /// before that module.
    pub fn aggregate(graphs: Vec<(String, DependencyGraph)>) -> Result<Aggregate> {
        let mut merged = DependencyGraph::new();
        let mut rejected = Vec::new();

        for (module, graph) in graphs {
            let mut candidate = merged.clone();
            Self::merge(&mut candidate, graph)?;

            match candidate.find_cycle() {
                Some(cycle) => {
                    let path = cycle
                        .iter()
                        .map(|k| k.to_string())
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    tracing::warn!(module = %module, cycle = %path, "module closes a dependency cycle");
                    rejected.push(RejectedModule {
                        module,
                        error: SbomError::DependencyCycle { path },
                    });
                }
                None => merged = candidate,
            }
        }

        tracing::debug!(
            components = merged.component_count(),
            edges = merged.edge_count(),
            roots = merged.roots().len(),
            rejected = rejected.len(),
            "graphs aggregated"
        );
        Ok(Aggregate {
            graph: merged,
            rejected,
        })
    }

    fn merge(merged: &mut DependencyGraph, graph: DependencyGraph) -> Result<()> {
        let parts = graph.into_parts();
        let mut warnings = parts.warnings;

        for component in parts.components {
            match merged.component_mut(component.key()) {
                Some(existing) => {
                    warnings.extend(MetadataEnricher::merge_component(existing, &component));
                }
                None => {
                    merged.insert_component(component);
                }
            }
        }
        for (parent, child) in &parts.edges {
            merged.add_edge(parent, child)?;
        }
        for root in parts.roots {
            merged.add_root(root)?;
        }
        for warning in warnings {
            merged.push_warning(warning);
        }
        Ok(())
    }

    /// Designates the metadata component of an aggregate graph.
    ///
    /// A configured component is added (or merged into an existing node
    /// with the same key); without one the first module root is used. The
    /// metadata component then depends on every module root except itself
    /// and except roots that already depend on it, directly or not.
    ///
    /// # Errors
    /// Fails when no component is configured and the graph has no roots.
    pub fn attach_metadata_component(
        graph: &mut DependencyGraph,
        configured: Option<Component>,
    ) -> Result<ComponentKey> {
        let key = match configured {
            Some(component) => {
                let key = component.key().clone();
                let mut warnings = Vec::new();
                match graph.component_mut(&key) {
                    Some(existing) => {
                        warnings = MetadataEnricher::merge_component(existing, &component);
                    }
                    None => {
                        graph.insert_component(component);
                    }
                }
                for warning in warnings {
                    graph.push_warning(warning);
                }
                key
            }
            None => match graph.roots().first() {
                Some(first) => first.clone(),
                None => anyhow::bail!("Cannot choose a metadata component: no module roots"),
            },
        };

        let roots: Vec<ComponentKey> = graph
            .roots()
            .iter()
            .filter(|root| **root != key && !graph.reaches(root, &key))
            .cloned()
            .collect();
        for root in &roots {
            graph.add_edge(&key, root)?;
        }
        Ok(key)
    }
}
