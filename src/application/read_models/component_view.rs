//! Component view structs for read model
//!
//! These structs provide a flattened, query-optimized view of component data.

/// View representation of a software component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentView {
    /// BOM reference identifier (the purl)
    pub bom_ref: String,
    /// `library`, `framework` or `application`
    pub component_type: String,
    /// Component group; absent when the resolver had none
    pub group: Option<String>,
    pub name: String,
    /// Resolved version, or the `unspecified` marker
    pub version: String,
    /// Package URL (purl)
    pub purl: String,
    pub licenses: Vec<LicenseView>,
    pub supplier: Option<SupplierView>,
    /// Sorted by algorithm
    pub hashes: Vec<HashView>,
    pub external_references: Vec<ExternalReferenceView>,
    pub description: Option<String>,
    pub properties: Vec<PropertyView>,
}

/// View representation of license information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseView {
    /// SPDX license identifier
    pub spdx_id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierView {
    pub name: Option<String>,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashView {
    /// CycloneDX algorithm name, e.g. `SHA-256`
    pub algorithm: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalReferenceView {
    pub reference_type: String,
    pub url: String,
}

/// Name/value pair attached to a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyView {
    pub name: String,
    pub value: String,
}
