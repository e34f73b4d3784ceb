use super::filters::{ArtifactFilter, NameFilter};
use super::identity_resolver::IdentityResolver;
use super::metadata_enricher::MetadataEnricher;
use crate::sbom_generation::domain::{
    Component, ComponentIdentity, ComponentKey, ConfigurationScope, DependencyGraph,
    DiscoveryOrder, GraphError, GraphWarning, PackageType, RawCoordinates, ResolvedModule,
    ResolvedNode, ResolvedScope,
};
use std::collections::{HashMap, HashSet};

/// DependencyGraphBuilder walks one module's resolved scopes and produces
/// its dependency graph.
///
/// The builder holds only shared, read-only configuration; all walk state
/// lives in a per-call context, so independent modules can be built from
/// different threads.
pub struct DependencyGraphBuilder<'a> {
    resolver: &'a IdentityResolver,
    scope_filter: &'a NameFilter,
    exclusions: &'a ArtifactFilter,
    project_type: PackageType,
    resolve_metadata: bool,
}

impl<'a> DependencyGraphBuilder<'a> {
    pub fn new(
        resolver: &'a IdentityResolver,
        scope_filter: &'a NameFilter,
        exclusions: &'a ArtifactFilter,
        project_type: PackageType,
    ) -> Self {
        Self {
            resolver,
            scope_filter,
            exclusions,
            project_type,
            resolve_metadata: true,
        }
    }

    /// Whether metadata carried on nodes and module roots is applied
    pub fn with_metadata_resolution(mut self, enabled: bool) -> Self {
        self.resolve_metadata = enabled;
        self
    }

    /// Builds the graph of one module: its root component, every component
    /// reachable through an accepted scope, and the edges between them.
    ///
    /// # Errors
    /// A cycle, a reference to an unknown node id, or an invalid identity
    /// aborts the whole module.
    pub fn build(
        &self,
        module: &ResolvedModule,
        module_index: usize,
    ) -> Result<DependencyGraph, GraphError> {
        let mut walk = ModuleWalk {
            builder: self,
            module_name: module.name(),
            module_index,
            graph: DependencyGraph::new(),
            sequence: 0,
        };

        let root = walk.add_root(module)?;
        for scope in &module.scopes {
            if !self.scope_filter.accepts(&scope.name) {
                tracing::debug!(module = walk.module_name, scope = %scope.name, "scope filtered out");
                continue;
            }
            walk.walk_scope(&root, scope)?;
            walk.check_acyclic(&scope.name)?;
        }

        tracing::debug!(
            module = walk.module_name,
            components = walk.graph.component_count(),
            edges = walk.graph.edge_count(),
            "module graph built"
        );
        Ok(walk.graph)
    }
}

/// Per-module walk state
struct ModuleWalk<'b, 'a> {
    builder: &'b DependencyGraphBuilder<'a>,
    module_name: &'b str,
    module_index: usize,
    graph: DependencyGraph,
    sequence: usize,
}

/// One node being expanded on the active path
struct Frame<'s> {
    node: &'s ResolvedNode,
    key: ComponentKey,
    next_child: usize,
}

/// Per-scope walk state
struct ScopeState<'s> {
    scope: &'s ResolvedScope,
    nodes: HashMap<&'s str, &'s ResolvedNode>,
    /// Resolved key per node id; `None` for excluded artifacts
    keys: HashMap<&'s str, Option<ComponentKey>>,
    /// Node ids whose subtree has been fully walked
    done: HashSet<&'s str>,
    /// Keys on the active path, module root included
    on_path: HashSet<ComponentKey>,
    path: Vec<ComponentKey>,
}

impl<'b, 'a> ModuleWalk<'b, 'a> {
    fn add_root(&mut self, module: &ResolvedModule) -> Result<ComponentKey, GraphError> {
        let identity = self.resolve(&module.project.coordinates)?;
        let package_type = module
            .project
            .package_type
            .unwrap_or(self.builder.project_type);
        let mut root = Component::new(identity, package_type, self.next_discovery());
        let metadata = module
            .project
            .metadata
            .as_ref()
            .filter(|_| self.builder.resolve_metadata);
        if let Some(metadata) = metadata {
            for warning in MetadataEnricher::enrich(&mut root, metadata) {
                self.graph.push_warning(warning);
            }
        }

        let key = root.key().clone();
        self.graph.insert_component(root);
        self.graph
            .add_root(key.clone())
            .map_err(|e| self.inconsistent(e))?;
        Ok(key)
    }

    fn walk_scope(&mut self, root: &ComponentKey, scope: &ResolvedScope) -> Result<(), GraphError> {
        tracing::debug!(module = self.module_name, scope = %scope.name, "walking scope");

        let mut nodes = HashMap::with_capacity(scope.nodes.len());
        for node in &scope.nodes {
            nodes.entry(node.id.as_str()).or_insert(node);
        }
        let mut state = ScopeState {
            scope,
            nodes,
            keys: HashMap::new(),
            done: HashSet::new(),
            on_path: HashSet::from([root.clone()]),
            path: vec![root.clone()],
        };

        let mut stack: Vec<Frame> = Vec::new();
        for root_id in &scope.roots {
            if let Some(frame) = self.enter(&mut state, root, root_id)? {
                stack.push(frame);
            }

            while let Some(frame) = stack.last_mut() {
                let node: &ResolvedNode = frame.node;
                if frame.next_child < node.dependencies.len() {
                    let child_id = node.dependencies[frame.next_child].as_str();
                    frame.next_child += 1;
                    let parent = frame.key.clone();
                    if let Some(child) = self.enter(&mut state, &parent, child_id)? {
                        stack.push(child);
                    }
                } else if let Some(finished) = stack.pop() {
                    state.on_path.remove(&finished.key);
                    state.path.pop();
                    state.done.insert(finished.node.id.as_str());
                }
            }
        }
        Ok(())
    }

    /// Fails when the edges recorded so far, across every scope walked,
    /// form a cycle. Node ids sharing one identity can close a loop the
    /// per-scope walk never sees on its active path.
    fn check_acyclic(&self, scope: &str) -> Result<(), GraphError> {
        match self.graph.find_cycle() {
            Some(cycle) => Err(GraphError::Cycle {
                module: self.module_name.to_string(),
                scope: scope.to_string(),
                path: cycle
                    .iter()
                    .map(|k| k.to_string())
                    .collect::<Vec<_>>()
                    .join(" -> "),
            }),
            None => Ok(()),
        }
    }

    /// Visits `id` as a child of `parent`. Returns a frame when the node's
    /// own dependencies still have to be walked.
    fn enter<'s>(
        &mut self,
        state: &mut ScopeState<'s>,
        parent: &ComponentKey,
        id: &'s str,
    ) -> Result<Option<Frame<'s>>, GraphError> {
        let node = *state
            .nodes
            .get(id)
            .ok_or_else(|| GraphError::UnknownNode {
                module: self.module_name.to_string(),
                scope: state.scope.name.clone(),
                id: id.to_string(),
            })?;

        let first_visit = !state.keys.contains_key(id);
        if first_visit {
            let identity = self.resolve(&node.coordinates)?;
            let key = identity.key().clone();
            if self.builder.exclusions.excludes(&key) {
                tracing::debug!(module = self.module_name, component = %key, "artifact excluded");
                state.keys.insert(id, None);
            } else {
                if !self.graph.contains(&key) {
                    let package_type = node.package_type.unwrap_or_default();
                    let mut component =
                        Component::new(identity, package_type, self.next_discovery());
                    component.set_unresolved(node.unresolved);
                    self.graph.insert_component(component);
                }
                self.record_sighting(&key, node, &state.scope.name);
                state.keys.insert(id, Some(key));
            }
        }

        let key = match state.keys.get(id) {
            Some(Some(key)) => key.clone(),
            _ => return Ok(None),
        };

        if state.on_path.contains(&key) {
            let start = state.path.iter().position(|k| k == &key).unwrap_or(0);
            let mut cycle: Vec<String> = state.path[start..].iter().map(|k| k.to_string()).collect();
            cycle.push(key.to_string());
            return Err(GraphError::Cycle {
                module: self.module_name.to_string(),
                scope: state.scope.name.clone(),
                path: cycle.join(" -> "),
            });
        }

        self.graph
            .add_edge(parent, &key)
            .map_err(|e| self.inconsistent(e))?;

        if state.done.contains(id) {
            return Ok(None);
        }

        state.on_path.insert(key.clone());
        state.path.push(key.clone());
        Ok(Some(Frame {
            node,
            key,
            next_child: 0,
        }))
    }

    /// Applies one node's observations to its component: scope membership,
    /// resolution state, package type and node-level metadata.
    fn record_sighting(&mut self, key: &ComponentKey, node: &ResolvedNode, scope: &str) {
        let module_name = self.module_name;
        let resolve_metadata = self.builder.resolve_metadata;
        let mut warnings = Vec::new();

        if let Some(component) = self.graph.component_mut(key) {
            component.add_scope(ConfigurationScope::new(module_name, scope));
            component.observe_resolution(node.unresolved);

            if let Some(package_type) = node.package_type {
                if !component.observe_package_type(package_type) {
                    warnings.push(GraphWarning::TypeConflict {
                        component: key.clone(),
                        kept: component.package_type(),
                        rejected: package_type,
                    });
                }
            }
            if let Some(metadata) = node.metadata.as_ref().filter(|_| resolve_metadata) {
                warnings.extend(MetadataEnricher::enrich(component, metadata));
            }
        }

        if node.unresolved {
            tracing::debug!(module = module_name, scope, component = %key, "unresolved dependency");
            warnings.push(GraphWarning::Unresolved {
                component: key.clone(),
                module: module_name.to_string(),
                scope: scope.to_string(),
            });
        }

        for warning in warnings {
            self.graph.push_warning(warning);
        }
    }

    fn resolve(&self, coordinates: &RawCoordinates) -> Result<ComponentIdentity, GraphError> {
        self.builder
            .resolver
            .resolve(coordinates)
            .map_err(|e| GraphError::InvalidIdentity {
                module: self.module_name.to_string(),
                details: format!("{} ({:?})", e, coordinates.name),
            })
    }

    fn next_discovery(&mut self) -> DiscoveryOrder {
        let order = DiscoveryOrder::new(self.module_index, self.sequence);
        self.sequence += 1;
        order
    }

    fn inconsistent(&self, error: anyhow::Error) -> GraphError {
        GraphError::Inconsistent {
            module: self.module_name.to_string(),
            details: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{License, MetadataSource, ProjectInfo};

    fn node(id: &str, group: &str, name: &str, version: &str, deps: &[&str]) -> ResolvedNode {
        ResolvedNode::new(id, RawCoordinates::new(group, name, version)).depends_on(deps)
    }

    fn scope(name: &str, roots: &[&str], nodes: Vec<ResolvedNode>) -> ResolvedScope {
        ResolvedScope {
            name: name.to_string(),
            roots: roots.iter().map(|r| r.to_string()).collect(),
            nodes,
        }
    }

    fn module(name: &str, scopes: Vec<ResolvedScope>) -> ResolvedModule {
        ResolvedModule {
            project: ProjectInfo {
                coordinates: RawCoordinates::new("com.acme", name, "1.0"),
                path: Some(format!(":{}", name)),
                package_type: None,
                metadata: None,
            },
            scopes,
        }
    }

    fn build(module: &ResolvedModule) -> Result<DependencyGraph, GraphError> {
        build_with(module, NameFilter::default(), ArtifactFilter::default())
    }

    fn build_with(
        module: &ResolvedModule,
        scopes: NameFilter,
        exclusions: ArtifactFilter,
    ) -> Result<DependencyGraph, GraphError> {
        let resolver = IdentityResolver::default();
        let builder =
            DependencyGraphBuilder::new(&resolver, &scopes, &exclusions, PackageType::Library);
        builder.build(module, 0)
    }

    fn key(group: &str, name: &str, version: &str) -> ComponentKey {
        ComponentKey::new(
            group.to_string(),
            name.to_string(),
            version.to_string(),
            None,
            None,
        )
    }

    #[test]
    fn test_diamond_collapses_shared_dependency() {
        let m = module(
            "m",
            vec![scope(
                "runtimeClasspath",
                &["core", "util"],
                vec![
                    node("core", "lib", "core", "1.0", &[]),
                    node("util", "lib", "util", "2.0", &["core"]),
                ],
            )],
        );

        let graph = build(&m).unwrap();
        let root = key("com.acme", "m", "1.0");
        let core = key("lib", "core", "1.0");
        let util = key("lib", "util", "2.0");

        assert_eq!(graph.component_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.has_edge(&root, &core));
        assert!(graph.has_edge(&root, &util));
        assert!(graph.has_edge(&util, &core));
        assert_eq!(graph.roots(), &[root]);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let m = module(
            "m",
            vec![scope(
                "runtimeClasspath",
                &["a"],
                vec![
                    node("a", "x", "a", "1", &["b"]),
                    node("b", "x", "b", "1", &["a"]),
                ],
            )],
        );

        let err = build(&m).unwrap_err();
        match err {
            GraphError::Cycle {
                module,
                scope,
                path,
            } => {
                assert_eq!(module, ":m");
                assert_eq!(scope, "runtimeClasspath");
                assert_eq!(path, "x:a:1 -> x:b:1 -> x:a:1");
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let m = module(
            "m",
            vec![scope(
                "compileClasspath",
                &["a"],
                vec![node("a", "x", "a", "1", &["a"])],
            )],
        );
        assert!(matches!(build(&m), Err(GraphError::Cycle { .. })));
    }

    #[test]
    fn test_cycle_through_distinct_ids_with_same_identity() {
        let m = module(
            "m",
            vec![scope(
                "runtimeClasspath",
                &["a1"],
                vec![
                    node("a1", "x", "a", "1", &["b"]),
                    node("b", "x", "b", "1", &["a2"]),
                    node("a2", "x", "a", "1", &[]),
                ],
            )],
        );
        assert!(matches!(build(&m), Err(GraphError::Cycle { .. })));
    }

    #[test]
    fn test_cycle_closed_through_already_walked_node() {
        // d -> x1 is walked first; x2 shares x1's identity and loops back to d
        let m = module(
            "m",
            vec![scope(
                "runtimeClasspath",
                &["d", "x2"],
                vec![
                    node("d", "lib", "d", "1", &["x1"]),
                    node("x1", "lib", "x", "1", &[]),
                    node("x2", "lib", "x", "1", &["d"]),
                ],
            )],
        );

        match build(&m).unwrap_err() {
            GraphError::Cycle { scope, path, .. } => {
                assert_eq!(scope, "runtimeClasspath");
                assert_eq!(path, "lib:d:1 -> lib:x:1 -> lib:d:1");
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_across_scopes_is_rejected() {
        let m = module(
            "m",
            vec![
                scope(
                    "runtimeClasspath",
                    &["a"],
                    vec![
                        node("a", "x", "a", "1", &["b"]),
                        node("b", "x", "b", "1", &[]),
                    ],
                ),
                scope(
                    "testRuntimeClasspath",
                    &["b"],
                    vec![
                        node("b", "x", "b", "1", &["a"]),
                        node("a", "x", "a", "1", &[]),
                    ],
                ),
            ],
        );

        match build(&m).unwrap_err() {
            GraphError::Cycle { scope, path, .. } => {
                assert_eq!(scope, "testRuntimeClasspath");
                assert_eq!(path, "x:a:1 -> x:b:1 -> x:a:1");
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_node_is_fatal() {
        let m = module(
            "m",
            vec![scope(
                "runtimeClasspath",
                &["a"],
                vec![node("a", "x", "a", "1", &["ghost"])],
            )],
        );
        let err = build(&m).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownNode {
                module: ":m".to_string(),
                scope: "runtimeClasspath".to_string(),
                id: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_identity_is_fatal() {
        let m = module(
            "m",
            vec![scope(
                "runtimeClasspath",
                &["a"],
                vec![node("a", "x", " ", "1", &[])],
            )],
        );
        assert!(matches!(build(&m), Err(GraphError::InvalidIdentity { .. })));
    }

    #[test]
    fn test_shared_subtree_walked_once_per_scope() {
        // a -> c, b -> c, c -> d: d's edge is recorded once
        let m = module(
            "m",
            vec![scope(
                "runtimeClasspath",
                &["a", "b"],
                vec![
                    node("a", "x", "a", "1", &["c"]),
                    node("b", "x", "b", "1", &["c"]),
                    node("c", "x", "c", "1", &["d"]),
                    node("d", "x", "d", "1", &[]),
                ],
            )],
        );
        let graph = build(&m).unwrap();
        assert_eq!(graph.component_count(), 5);
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn test_component_reused_across_scopes() {
        let m = module(
            "m",
            vec![
                scope(
                    "runtimeClasspath",
                    &["core"],
                    vec![node("core", "lib", "core", "1.0", &[])],
                ),
                scope(
                    "testRuntimeClasspath",
                    &["c", "junit"],
                    vec![
                        node("c", "lib", "core", "1.0", &[]),
                        node("junit", "junit", "junit", "4.13", &[]),
                    ],
                ),
            ],
        );
        let graph = build(&m).unwrap();
        assert_eq!(graph.component_count(), 3);

        let core = graph.component(&key("lib", "core", "1.0")).unwrap();
        assert_eq!(core.scopes().len(), 2);
        assert!(!core.is_test_only());

        let junit = graph.component(&key("junit", "junit", "4.13")).unwrap();
        assert!(junit.is_test_only());
    }

    #[test]
    fn test_scope_filter_skips_entire_scope() {
        let m = module(
            "m",
            vec![
                scope(
                    "runtimeClasspath",
                    &["core"],
                    vec![node("core", "lib", "core", "1.0", &[])],
                ),
                scope(
                    "testRuntimeClasspath",
                    &["junit"],
                    vec![node("junit", "junit", "junit", "4.13", &[])],
                ),
            ],
        );
        let filter = NameFilter::new(&[], &["test*".to_string()]).unwrap();
        let graph = build_with(&m, filter, ArtifactFilter::default()).unwrap();

        assert_eq!(graph.component_count(), 2);
        assert!(!graph.contains(&key("junit", "junit", "4.13")));
    }

    #[test]
    fn test_excluded_artifact_and_its_subtree_are_skipped() {
        let m = module(
            "m",
            vec![scope(
                "runtimeClasspath",
                &["a", "b"],
                vec![
                    node("a", "x", "a", "1", &["hidden"]),
                    node("hidden", "x", "hidden", "1", &[]),
                    node("b", "excluded", "b", "1", &["only-via-b"]),
                    node("only-via-b", "x", "deep", "1", &[]),
                ],
            )],
        );
        let exclusions = ArtifactFilter::new(&["excluded".to_string()]).unwrap();
        let graph = build_with(&m, NameFilter::default(), exclusions).unwrap();

        assert!(graph.contains(&key("x", "hidden", "1")));
        assert!(!graph.contains(&key("excluded", "b", "1")));
        assert!(!graph.contains(&key("x", "deep", "1")));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_unresolved_node_is_kept_and_flagged() {
        let mut missing = ResolvedNode::new(
            "ghost",
            RawCoordinates {
                group: Some("lib".to_string()),
                name: "ghost".to_string(),
                version: None,
                classifier: None,
                extension: None,
            },
        );
        missing.unresolved = true;
        let m = module("m", vec![scope("runtimeClasspath", &["ghost"], vec![missing])]);

        let graph = build(&m).unwrap();
        let ghost = graph.component(&key("lib", "ghost", "unspecified")).unwrap();
        assert!(ghost.is_unresolved());
        assert!(graph
            .warnings()
            .iter()
            .any(|w| matches!(w, GraphWarning::Unresolved { .. })));
    }

    #[test]
    fn test_type_conflict_keeps_first_seen() {
        let mut first = node("a", "x", "a", "1", &[]);
        first.package_type = Some(PackageType::Framework);
        let mut second = node("a2", "x", "a", "1", &[]);
        second.package_type = Some(PackageType::Library);
        let m = module(
            "m",
            vec![scope("runtimeClasspath", &["a", "a2"], vec![first, second])],
        );

        let graph = build(&m).unwrap();
        let a = graph.component(&key("x", "a", "1")).unwrap();
        assert_eq!(a.package_type(), PackageType::Framework);
        assert!(a.conflicting_types().contains(&PackageType::Library));
        assert!(graph
            .warnings()
            .iter()
            .any(|w| matches!(w, GraphWarning::TypeConflict { .. })));
    }

    #[test]
    fn test_node_metadata_is_applied() {
        let mut core = node("core", "lib", "core", "1.0", &[]);
        core.metadata = Some(MetadataSource {
            licenses: vec![License::spdx("Apache-2.0")],
            ..Default::default()
        });
        let m = module("m", vec![scope("runtimeClasspath", &["core"], vec![core])]);

        let graph = build(&m).unwrap();
        let core = graph.component(&key("lib", "core", "1.0")).unwrap();
        assert_eq!(core.licenses()[0].id(), Some("Apache-2.0"));
    }

    #[test]
    fn test_node_metadata_skipped_without_metadata_resolution() {
        let mut core = node("core", "lib", "core", "1.0", &[]);
        core.metadata = Some(MetadataSource {
            licenses: vec![License::spdx("Apache-2.0")],
            ..Default::default()
        });
        let mut m = module("m", vec![scope("runtimeClasspath", &["core"], vec![core])]);
        m.project.metadata = Some(MetadataSource {
            description: Some("Module m".to_string()),
            ..Default::default()
        });

        let resolver = IdentityResolver::default();
        let (scopes, exclusions) = (NameFilter::default(), ArtifactFilter::default());
        let graph =
            DependencyGraphBuilder::new(&resolver, &scopes, &exclusions, PackageType::Library)
                .with_metadata_resolution(false)
                .build(&m, 0)
                .unwrap();

        assert!(graph.component(&key("lib", "core", "1.0")).unwrap().licenses().is_empty());
        let root = graph.component(&key("com.acme", "m", "1.0")).unwrap();
        assert_eq!(root.description(), None);
    }

    #[test]
    fn test_discovery_order_is_preorder() {
        let m = module(
            "m",
            vec![scope(
                "runtimeClasspath",
                &["z", "a"],
                vec![
                    node("z", "x", "z", "1", &["y"]),
                    node("y", "x", "y", "1", &[]),
                    node("a", "x", "a", "1", &[]),
                ],
            )],
        );
        let graph = build(&m).unwrap();
        let order = |name: &str| graph.component(&key("x", name, "1")).unwrap().discovered_at();
        assert!(order("z") < order("y"));
        assert!(order("y") < order("a"));
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let depth = 20_000;
        let ids: Vec<String> = (0..depth).map(|i| format!("n{}", i)).collect();
        let nodes: Vec<ResolvedNode> = (0..depth)
            .map(|i| {
                let deps: Vec<&str> = if i + 1 < depth {
                    vec![ids[i + 1].as_str()]
                } else {
                    vec![]
                };
                node(&ids[i], "chain", &ids[i], "1", &deps)
            })
            .collect();
        let m = module("m", vec![scope("runtimeClasspath", &["n0"], nodes)]);

        let graph = build(&m).unwrap();
        assert_eq!(graph.component_count(), depth + 1);
        assert_eq!(graph.edge_count(), depth);
    }
}
