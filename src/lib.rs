//! resolved-sbom - SBOM aggregation engine for resolved dependency graphs
//!
//! This library turns a dependency-resolution export of a multi-module build
//! into deduplicated CycloneDX 1.6 BOMs, following hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): Graph model, merge policies and pure services
//! - **Application Layer** (`application`): Use cases, DTOs and read models
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use resolved_sbom::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! // Create adapters
//! let resolution_reader = FileSystemReader::new();
//! let metadata_repository = DescriptorRepository::new();
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = GenerateSbomUseCase::new(
//!     resolution_reader,
//!     metadata_repository,
//!     progress_reporter,
//! );
//!
//! // Execute
//! let request = SbomRequest::new(PathBuf::from("build/resolution.json"), SbomOptions::default());
//! let response = use_case.execute(request)?;
//!
//! // Format output
//! let formatter = CycloneDxFormatter::new();
//! for document in &response.documents {
//!     println!("{}", formatter.format(&document.model)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::CycloneDxFormatter;
    pub use crate::adapters::outbound::metadata::DescriptorRepository;
    pub use crate::application::dto::{
        ComponentOrder, ModuleFailure, RunSummary, SbomDocument, SbomOptions, SbomRequest,
        SbomResponse, UnresolvedEdgePolicy,
    };
    pub use crate::application::read_models::{SbomReadModel, SbomReadModelBuilder};
    pub use crate::application::use_cases::GenerateSbomUseCase;
    pub use crate::ports::outbound::{
        MetadataRepository, OutputPresenter, ProgressReporter, ResolutionReader, SbomFormatter,
    };
    pub use crate::sbom_generation::domain::{
        Component, ComponentDescriptor, ComponentIdentity, ComponentKey, DependencyGraph,
        ExternalReference, ExternalReferenceType, License, MetadataSource, PackageType, RawCoordinates, ResolvedBuild, ResolvedModule,
        ResolvedNode, ResolvedScope, SbomMetadata, Supplier,
    };
    pub use crate::sbom_generation::services::{
        BuildEnvironment, GraphAggregator, IdentityResolver, SbomGenerator,
    };
    pub use crate::shared::Result;
}
