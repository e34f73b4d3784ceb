//! Read models for CQRS-lite pattern
//!
//! This module contains view-optimized structs that provide
//! a denormalized representation of domain data for queries.

pub mod component_view;
pub mod dependency_view;
pub mod sbom_read_model;
pub mod sbom_read_model_builder;

pub use component_view::{
    ComponentView, ExternalReferenceView, HashView, LicenseView, PropertyView, SupplierView,
};
pub use dependency_view::DependencyView;
pub use sbom_read_model::{SbomMetadataView, SbomReadModel};
pub use sbom_read_model_builder::SbomReadModelBuilder;
