pub mod component;
pub mod component_key;
pub mod dependency_graph;
pub mod graph_error;
pub mod license;
pub mod metadata_source;
pub mod resolution;
pub mod sbom_metadata;

pub use component::{
    Component, ComponentHash, ConfigurationScope, DiscoveryOrder, ExternalReference,
    ExternalReferenceType, HashAlgorithm, Supplier,
};
pub use component_key::{ComponentIdentity, ComponentKey, PackageType, RawCoordinates, UNSPECIFIED};
pub use dependency_graph::{DependencyGraph, GraphParts};
pub use graph_error::{GraphError, GraphWarning};
pub use license::License;
pub use metadata_source::MetadataSource;
pub use resolution::{
    ComponentDescriptor, ProjectInfo, ResolvedBuild, ResolvedModule, ResolvedNode, ResolvedScope,
};
pub use sbom_metadata::SbomMetadata;
