mod build_environment;
mod filters;
mod graph_aggregator;
mod graph_builder;
mod identity_resolver;
mod metadata_enricher;
mod sbom_generator;
mod scm_url;

pub use build_environment::BuildEnvironment;
pub use filters::{ArtifactFilter, NameFilter};
pub use graph_aggregator::{Aggregate, GraphAggregator, RejectedModule};
pub use graph_builder::DependencyGraphBuilder;
pub use identity_resolver::IdentityResolver;
pub use metadata_enricher::MetadataEnricher;
pub use sbom_generator::SbomGenerator;
pub use scm_url::ScmUrlConverter;
