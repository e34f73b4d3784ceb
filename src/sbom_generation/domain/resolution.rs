use super::{MetadataSource, PackageType, RawCoordinates};
use serde::Deserialize;

/// Complete resolver export: every module's resolved scopes plus the
/// metadata descriptors the resolver could fetch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBuild {
    #[serde(default)]
    pub modules: Vec<ResolvedModule>,
    #[serde(default)]
    pub descriptors: Vec<ComponentDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedModule {
    pub project: ProjectInfo,
    #[serde(default)]
    pub scopes: Vec<ResolvedScope>,
}

impl ResolvedModule {
    /// Name used for filters, scope membership and the run summary
    pub fn name(&self) -> &str {
        self.project.module_name()
    }
}

/// Project metadata for a module root
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(flatten)]
    pub coordinates: RawCoordinates,
    /// Build path of the module, e.g. `:app`
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub package_type: Option<PackageType>,
    #[serde(default)]
    pub metadata: Option<MetadataSource>,
}

impl ProjectInfo {
    pub fn module_name(&self) -> &str {
        self.path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&self.coordinates.name)
    }
}

/// One resolved scope (configuration) of a module
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedScope {
    pub name: String,
    /// Node ids of the dependencies declared directly in this scope
    #[serde(default)]
    pub roots: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<ResolvedNode>,
}

/// One node of a resolved scope, referencing its children by scope-local id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNode {
    pub id: String,
    #[serde(flatten)]
    pub coordinates: RawCoordinates,
    #[serde(default)]
    pub unresolved: bool,
    #[serde(default)]
    pub package_type: Option<PackageType>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub metadata: Option<MetadataSource>,
}

impl ResolvedNode {
    pub fn new(id: &str, coordinates: RawCoordinates) -> Self {
        Self {
            id: id.to_string(),
            coordinates,
            unresolved: false,
            package_type: None,
            dependencies: Vec::new(),
            metadata: None,
        }
    }

    pub fn depends_on(mut self, ids: &[&str]) -> Self {
        self.dependencies = ids.iter().map(|id| id.to_string()).collect();
        self
    }
}

/// POM-equivalent metadata document for one set of coordinates
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    #[serde(flatten)]
    pub coordinates: RawCoordinates,
    #[serde(default)]
    pub metadata: MetadataSource,
}
