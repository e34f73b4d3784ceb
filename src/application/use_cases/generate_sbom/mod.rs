use crate::application::dto::{
    ModuleFailure, RunSummary, SbomDocument, SbomOptions, SbomRequest, SbomResponse,
    UnresolvedEdgePolicy,
};
use crate::application::read_models::SbomReadModelBuilder;
use crate::ports::outbound::{MetadataRepository, ProgressReporter, ResolutionReader};
use crate::sbom_generation::domain::{
    Component, ComponentDescriptor, ComponentKey, DependencyGraph, DiscoveryOrder, GraphWarning,
    License, MetadataSource, ResolvedModule,
};
use crate::sbom_generation::services::{
    ArtifactFilter, DependencyGraphBuilder, GraphAggregator, IdentityResolver, MetadataEnricher,
    NameFilter, SbomGenerator,
};
use crate::shared::error::SbomError;
use crate::shared::Result;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

const PROGRESS_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Metadata descriptors shipped with the resolution export, indexed by
/// `group:name:version`
type DescriptorIndex = HashMap<String, Vec<MetadataSource>>;

/// Outcome of one module walk: its enriched graph or the reason it was
/// left out
type ModuleOutcome = std::result::Result<DependencyGraph, String>;

/// Read-only state shared by the parallel module walks
struct WalkContext<'a, MR> {
    builder: DependencyGraphBuilder<'a>,
    descriptors: &'a DescriptorIndex,
    metadata_repository: &'a MR,
    /// When false, descriptors are ignored and only authoritative
    /// repository sources are applied
    resolve_metadata: bool,
}

/// GenerateSbomUseCase - Core use case for SBOM generation
///
/// This use case orchestrates the SBOM generation workflow using
/// generic dependency injection for all infrastructure dependencies.
///
/// # Type Parameters
/// * `RR` - ResolutionReader implementation
/// * `MR` - MetadataRepository implementation
/// * `PR` - ProgressReporter implementation
pub struct GenerateSbomUseCase<RR, MR, PR> {
    resolution_reader: RR,
    metadata_repository: MR,
    progress_reporter: PR,
}

impl<RR, MR, PR> GenerateSbomUseCase<RR, MR, PR>
where
    RR: ResolutionReader,
    MR: MetadataRepository,
    PR: ProgressReporter,
{
    /// Creates a new GenerateSbomUseCase with injected dependencies
    pub fn new(resolution_reader: RR, metadata_repository: MR, progress_reporter: PR) -> Self {
        Self {
            resolution_reader,
            metadata_repository,
            progress_reporter,
        }
    }

    /// Executes the SBOM generation use case
    ///
    /// # Arguments
    /// * `request` - Input path and generation options
    ///
    /// # Returns
    /// One read model per emitted document plus the run summary
    ///
    /// # Errors
    /// Fails on unreadable input, invalid options, or when no module
    /// produced a usable graph. Errors inside a single module are recorded
    /// in the summary instead.
    pub fn execute(&self, request: SbomRequest) -> Result<SbomResponse> {
        let options = &request.options;

        // Step 1: Read the resolution export
        self.progress_reporter.report(&format!(
            "📖 Loading resolution export from: {}",
            request.input_path.display()
        ));
        let build = self
            .resolution_reader
            .read_resolution(&request.input_path)?;
        self.progress_reporter
            .report(&format!("✅ Detected {} module(s)", build.modules.len()));

        // Step 2: Prepare filters and the identity resolver
        let resolver = IdentityResolver::new(&options.purl_type);
        let scope_filter = NameFilter::new(&options.include_scopes, &options.skip_scopes)?;
        let module_filter = NameFilter::new(&options.include_modules, &options.skip_modules)?;
        let exclusions = ArtifactFilter::new(&options.exclude_artifacts)?;
        let descriptors = Self::index_descriptors(&resolver, &build.descriptors);

        // Step 3: Apply module filters
        let mut summary = RunSummary::default();
        let mut selected: Vec<(usize, &ResolvedModule)> = Vec::new();
        for (index, module) in build.modules.iter().enumerate() {
            if module_filter.accepts(module.name()) {
                selected.push((index, module));
            } else {
                summary.skipped.push(module.name().to_string());
            }
        }
        if !summary.skipped.is_empty() {
            self.progress_reporter.report(&format!(
                "🚫 Skipped {} module(s) based on filters",
                summary.skipped.len()
            ));
        }

        // Step 4: Walk modules in parallel, join in declaration order
        let context = WalkContext {
            builder: DependencyGraphBuilder::new(
                &resolver,
                &scope_filter,
                &exclusions,
                options.project_type,
            )
            .with_metadata_resolution(options.include_metadata_resolution),
            descriptors: &descriptors,
            metadata_repository: &self.metadata_repository,
            resolve_metadata: options.include_metadata_resolution,
        };
        let outcomes = self.walk_modules(&context, &selected)?;

        let mut graphs = Vec::new();
        for ((_, module), outcome) in selected.iter().zip(outcomes) {
            match outcome {
                Ok(graph) => {
                    summary.succeeded.push(module.name().to_string());
                    graphs.push((module.name().to_string(), graph));
                }
                Err(reason) => {
                    self.progress_reporter.report_error(&format!(
                        "❌ Module '{}' excluded: {}",
                        module.name(),
                        reason
                    ));
                    summary.failed.push(ModuleFailure {
                        module: module.name().to_string(),
                        reason,
                    });
                }
            }
        }

        if graphs.is_empty() {
            return Err(SbomError::NoUsableGraph {
                failed: summary.failed.len(),
                skipped: summary.skipped.len(),
            }
            .into());
        }

        // Step 5: Aggregate or keep one graph per module
        let finished = if options.aggregate {
            self.aggregate(graphs, &resolver, options, &mut summary)?
        } else {
            Self::per_module(graphs)?
        };

        // Step 6: Linearize every graph into a read model
        let mut documents = Vec::with_capacity(finished.len());
        for (name, mut graph, metadata_key) in finished {
            if options.unresolved_edges == UnresolvedEdgePolicy::Exclude {
                Self::drop_unresolved_edges(&mut graph);
            }
            Self::describe_build(&mut graph, &metadata_key, options);
            if !options.include_license_text {
                graph.components_mut().for_each(Component::drop_license_texts);
            }
            summary.warnings += self.log_warnings(graph.warnings());

            let metadata = SbomGenerator::generate_default_metadata(
                options.source_date_epoch,
                options.include_serial_number,
            )?
            .with_manufacture(options.manufacture.clone())
            .with_licenses(Self::document_licenses(options));

            let model = SbomReadModelBuilder::build(
                &graph,
                Some(&metadata_key),
                &metadata,
                options.component_order,
            )?;
            documents.push(SbomDocument { name, model });
        }

        for pattern in exclusions.unmatched_patterns() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Exclude pattern '{}' did not match any dependencies.",
                pattern
            ));
        }

        self.progress_reporter
            .report_completion(&format!("✅ Dependency graph complete: {}", summary));

        Ok(SbomResponse::new(documents, summary))
    }

    /// Indexes the descriptors of the resolution export by coordinates.
    ///
    /// Descriptors with an invalid identity are logged and ignored.
    fn index_descriptors(
        resolver: &IdentityResolver,
        descriptors: &[ComponentDescriptor],
    ) -> DescriptorIndex {
        let mut index = DescriptorIndex::new();
        for descriptor in descriptors {
            match resolver.resolve(&descriptor.coordinates) {
                Ok(identity) => index
                    .entry(identity.key().coordinates())
                    .or_default()
                    .push(descriptor.metadata.clone()),
                Err(e) => tracing::warn!(error = %e, "ignoring invalid descriptor"),
            }
        }
        index
    }

    /// Walks every selected module on the rayon pool.
    ///
    /// The walks run on a scoped worker thread while this thread polls the
    /// completed count and drives the progress reporter.
    fn walk_modules(
        &self,
        context: &WalkContext<'_, MR>,
        modules: &[(usize, &ResolvedModule)],
    ) -> Result<Vec<ModuleOutcome>> {
        let total = modules.len();
        let completed = AtomicUsize::new(0);

        thread::scope(|scope| {
            let worker = scope.spawn(|| {
                modules
                    .par_iter()
                    .map(|(index, module)| {
                        let outcome = Self::walk_module(context, module, *index);
                        completed.fetch_add(1, Ordering::Relaxed);
                        outcome
                    })
                    .collect::<Vec<_>>()
            });

            // Poll for updates until done
            while !worker.is_finished() {
                self.progress_reporter.report_progress(
                    completed.load(Ordering::Relaxed),
                    total,
                    Some("Walking module graphs..."),
                );
                thread::sleep(PROGRESS_POLL_INTERVAL);
            }
            self.progress_reporter
                .report_progress(total, total, Some("Module graphs complete"));

            worker
                .join()
                .map_err(|_| anyhow::anyhow!("A module walk panicked"))
        })
    }

    /// Builds and enriches one module graph
    fn walk_module(
        context: &WalkContext<'_, MR>,
        module: &ResolvedModule,
        index: usize,
    ) -> ModuleOutcome {
        let mut graph = context
            .builder
            .build(module, index)
            .map_err(|e| e.to_string())?;

        let keys: Vec<ComponentKey> = graph.components().map(|c| c.key().clone()).collect();
        for key in keys {
            let mut sources = if context.resolve_metadata {
                context
                    .descriptors
                    .get(&key.coordinates())
                    .cloned()
                    .unwrap_or_default()
            } else {
                Vec::new()
            };
            let repository_sources = context
                .metadata_repository
                .lookup(&key)
                .map_err(|e| format!("metadata lookup failed for {}: {}", key, e))?;
            sources.extend(
                repository_sources
                    .into_iter()
                    .filter(|source| context.resolve_metadata || source.authoritative),
            );

            let mut warnings = Vec::new();
            if let Some(component) = graph.component_mut(&key) {
                for source in &sources {
                    warnings.extend(MetadataEnricher::enrich(component, source));
                }
            }
            for warning in warnings {
                graph.push_warning(warning);
            }
        }

        Ok(graph)
    }

    /// Merges all module graphs and designates the metadata component
    fn aggregate(
        &self,
        graphs: Vec<(String, DependencyGraph)>,
        resolver: &IdentityResolver,
        options: &SbomOptions,
        summary: &mut RunSummary,
    ) -> Result<Vec<(String, DependencyGraph, ComponentKey)>> {
        let configured = match &options.metadata_component {
            Some(coordinates) => {
                let identity = resolver.resolve(coordinates)?;
                Some(Component::new(
                    identity,
                    options.project_type,
                    DiscoveryOrder::new(0, 0),
                ))
            }
            None => None,
        };

        let aggregate = GraphAggregator::aggregate(graphs)?;
        for rejected in aggregate.rejected {
            self.progress_reporter.report_error(&format!(
                "❌ Module '{}' excluded: {}",
                rejected.module, rejected.error
            ));
            summary.succeeded.retain(|name| *name != rejected.module);
            summary.failed.push(ModuleFailure {
                module: rejected.module,
                reason: rejected.error.to_string(),
            });
        }

        let mut merged = aggregate.graph;
        let metadata_key = GraphAggregator::attach_metadata_component(&mut merged, configured)?;

        self.progress_reporter.report(&format!(
            "📊 Aggregated {} component(s) and {} edge(s)",
            merged.component_count(),
            merged.edge_count()
        ));

        Ok(vec![(metadata_key.name().to_string(), merged, metadata_key)])
    }

    /// Keeps each module graph as its own document, rooted at the module
    fn per_module(
        graphs: Vec<(String, DependencyGraph)>,
    ) -> Result<Vec<(String, DependencyGraph, ComponentKey)>> {
        graphs
            .into_iter()
            .map(|(name, graph)| {
                let root = graph
                    .roots()
                    .first()
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("Module '{}' has no root component", name))?;
                Ok((name, graph, root))
            })
            .collect()
    }

    /// Adds the configured references, then the CI build and VCS
    /// references of the build environment, to the metadata component.
    fn describe_build(
        graph: &mut DependencyGraph,
        metadata_key: &ComponentKey,
        options: &SbomOptions,
    ) {
        let Some(component) = graph.component_mut(metadata_key) else {
            return;
        };
        MetadataEnricher::enrich(
            component,
            &MetadataSource {
                external_references: options.external_references.clone(),
                ..Default::default()
            },
        );
        let environment_references = options.build_environment.references(
            component.external_references(),
            options.include_build_system,
            options.build_system_environment_variable.as_deref(),
        );
        MetadataEnricher::enrich(
            component,
            &MetadataSource {
                external_references: environment_references,
                ..Default::default()
            },
        );
    }

    fn document_licenses(options: &SbomOptions) -> Vec<License> {
        if options.include_license_text {
            options.licenses.clone()
        } else {
            options
                .licenses
                .iter()
                .filter_map(License::without_text)
                .collect()
        }
    }

    fn drop_unresolved_edges(graph: &mut DependencyGraph) {
        let unresolved: HashSet<ComponentKey> = graph
            .components()
            .filter(|component| component.is_unresolved())
            .map(|component| component.key().clone())
            .collect();
        if !unresolved.is_empty() {
            graph.retain_edges(|_, child| !unresolved.contains(child));
        }
    }

    /// Logs every diagnostic and returns how many there were
    fn log_warnings(&self, warnings: &[GraphWarning]) -> usize {
        for warning in warnings {
            match warning {
                // Already logged where the conflict was detected
                GraphWarning::HashConflict { .. } => {}
                _ => tracing::warn!("{}", warning),
            }
        }
        if !warnings.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {} metadata or resolution issue(s) found",
                warnings.len()
            ));
        }
        warnings.len()
    }
}

#[cfg(test)]
mod tests;
