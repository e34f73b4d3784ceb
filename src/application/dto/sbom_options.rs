use crate::sbom_generation::domain::{
    ExternalReference, License, PackageType, RawCoordinates, Supplier,
};
use crate::sbom_generation::services::BuildEnvironment;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Order in which components are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentOrder {
    /// Sorted by group, name, version, qualifiers
    #[default]
    Canonical,
    /// First-discovery order: module order, then scope order, then
    /// depth-first preorder
    Declaration,
}

impl FromStr for ComponentOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "canonical" => Ok(ComponentOrder::Canonical),
            "declaration" => Ok(ComponentOrder::Declaration),
            _ => Err(format!(
                "Invalid component order: {}. Please specify 'canonical' or 'declaration'",
                s
            )),
        }
    }
}

impl fmt::Display for ComponentOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentOrder::Canonical => write!(f, "canonical"),
            ComponentOrder::Declaration => write!(f, "declaration"),
        }
    }
}

/// Whether edges pointing at unresolved components are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedEdgePolicy {
    /// Unresolved components keep their incoming edges
    #[default]
    Include,
    /// Unresolved components stay in the component list but no edge
    /// points at them
    Exclude,
}

impl FromStr for UnresolvedEdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "include" => Ok(UnresolvedEdgePolicy::Include),
            "exclude" => Ok(UnresolvedEdgePolicy::Exclude),
            _ => Err(format!(
                "Invalid unresolved edge policy: {}. Please specify 'include' or 'exclude'",
                s
            )),
        }
    }
}

impl fmt::Display for UnresolvedEdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedEdgePolicy::Include => write!(f, "include"),
            UnresolvedEdgePolicy::Exclude => write!(f, "exclude"),
        }
    }
}

/// All generation options in one record.
///
/// Every field defaults independently; the config file and the command line
/// each override whatever they set.
#[derive(Debug, Clone, PartialEq)]
pub struct SbomOptions {
    /// Scope name patterns to walk; empty means all
    pub include_scopes: Vec<String>,
    /// Scope name patterns never walked
    pub skip_scopes: Vec<String>,
    /// Module name patterns to include; empty means all
    pub include_modules: Vec<String>,
    /// Module name patterns to leave out
    pub skip_modules: Vec<String>,
    /// `group:name:version` patterns of artifacts to leave out
    pub exclude_artifacts: Vec<String>,
    /// One combined BOM (true) or one BOM per module (false)
    pub aggregate: bool,
    /// Explicit metadata component of the aggregate BOM
    pub metadata_component: Option<RawCoordinates>,
    pub include_serial_number: bool,
    /// Fixed Unix timestamp for reproducible documents
    pub source_date_epoch: Option<i64>,
    pub component_order: ComponentOrder,
    pub unresolved_edges: UnresolvedEdgePolicy,
    /// Package type of module roots that do not declare one
    pub project_type: PackageType,
    /// purl type segment, `maven` unless configured
    pub purl_type: String,
    /// Organization that manufactured the described software
    pub manufacture: Option<Supplier>,
    /// Document-level licenses
    pub licenses: Vec<License>,
    /// Keep full license texts; when false only ids, names and URLs are
    /// emitted
    pub include_license_text: bool,
    /// Apply node metadata, descriptors and repository lookups. When false
    /// only authoritative overrides are applied.
    pub include_metadata_resolution: bool,
    /// Add a `build-system` reference to the metadata component
    pub include_build_system: bool,
    /// Variable name or `${VAR}` pattern giving the build URL
    pub build_system_environment_variable: Option<String>,
    /// References added to the metadata component
    pub external_references: Vec<ExternalReference>,
    /// Environment the run happens in; source of CI and VCS references
    pub build_environment: BuildEnvironment,
}

impl Default for SbomOptions {
    fn default() -> Self {
        Self {
            include_scopes: Vec::new(),
            skip_scopes: Vec::new(),
            include_modules: Vec::new(),
            skip_modules: Vec::new(),
            exclude_artifacts: Vec::new(),
            aggregate: true,
            metadata_component: None,
            include_serial_number: true,
            source_date_epoch: None,
            component_order: ComponentOrder::default(),
            unresolved_edges: UnresolvedEdgePolicy::default(),
            project_type: PackageType::Library,
            purl_type: "maven".to_string(),
            manufacture: None,
            licenses: Vec::new(),
            include_license_text: false,
            include_metadata_resolution: true,
            include_build_system: true,
            build_system_environment_variable: None,
            external_references: Vec::new(),
            build_environment: BuildEnvironment::default(),
        }
    }
}
