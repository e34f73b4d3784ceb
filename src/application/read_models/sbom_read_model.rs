//! SBOM read model for query operations
//!
//! This module provides the main read model struct that aggregates
//! all SBOM data in a query-optimized format.

use super::component_view::{ComponentView, LicenseView, SupplierView};
use super::dependency_view::DependencyView;

/// Main read model for SBOM data
///
/// This struct provides a denormalized, query-optimized view of SBOM data
/// following the CQRS-lite pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomReadModel {
    /// SBOM metadata
    pub metadata: SbomMetadataView,
    /// Components in emitted order, metadata component excluded
    pub components: Vec<ComponentView>,
    /// One entry per emitted component, metadata component first
    pub dependencies: Vec<DependencyView>,
}

/// View representation of SBOM metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomMetadataView {
    /// Timestamp when the SBOM was created
    pub timestamp: String,
    /// Name of the tool that generated the SBOM
    pub tool_name: String,
    /// Version of the tool
    pub tool_version: String,
    /// Serial number of the SBOM
    pub serial_number: Option<String>,
    /// The component the document describes
    pub component: Option<ComponentView>,
    pub manufacture: Option<SupplierView>,
    pub licenses: Vec<LicenseView>,
}
