use crate::application::read_models::{
    ComponentView, DependencyView, LicenseView, SbomMetadataView, SbomReadModel, SupplierView,
};
use crate::ports::outbound::SbomFormatter;
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Bom {
    bom_format: &'static str,
    spec_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    serial_number: Option<String>,
    version: u32,
    metadata: Metadata,
    components: Vec<Component>,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Serialize)]
struct Dependency {
    #[serde(rename = "ref")]
    bom_ref: String,
    #[serde(rename = "dependsOn", skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Metadata {
    timestamp: String,
    tools: Tools,
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manufacture: Option<OrganizationalEntity>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<License>,
}

#[derive(Debug, Serialize)]
struct Tools {
    components: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "type")]
    component_type: &'static str,
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct Component {
    #[serde(rename = "type")]
    component_type: String,
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    supplier: Option<OrganizationalEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<Hash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<License>,
    purl: String,
    #[serde(rename = "externalReferences", skip_serializing_if = "Vec::is_empty")]
    external_references: Vec<ExternalReference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
}

#[derive(Debug, Serialize)]
struct OrganizationalEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    url: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Hash {
    alg: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct License {
    license: LicenseContent,
}

/// Exactly one of `id` and `name` is set
#[derive(Debug, Serialize)]
struct LicenseContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<LicenseText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct LicenseText {
    content: String,
}

#[derive(Debug, Serialize)]
struct ExternalReference {
    #[serde(rename = "type")]
    reference_type: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct Property {
    name: String,
    value: String,
}

/// CycloneDxFormatter adapter for generating CycloneDX 1.6 JSON format
///
/// This adapter implements the SbomFormatter port for CycloneDX format.
/// Field order and array order follow the read model exactly, so equal
/// read models serialize to identical bytes.
pub struct CycloneDxFormatter;

impl CycloneDxFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CycloneDxFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for CycloneDxFormatter {
    fn format(&self, model: &SbomReadModel) -> Result<String> {
        let bom = Bom {
            bom_format: "CycloneDX",
            spec_version: "1.6",
            serial_number: model.metadata.serial_number.clone(),
            version: 1,
            metadata: self.build_metadata(&model.metadata),
            components: model
                .components
                .iter()
                .map(|c| self.build_component(c))
                .collect(),
            dependencies: self.build_dependencies(&model.dependencies),
        };

        serde_json::to_string_pretty(&bom).map_err(Into::into)
    }
}

impl CycloneDxFormatter {
    /// Build metadata from SbomMetadataView
    fn build_metadata(&self, metadata: &SbomMetadataView) -> Metadata {
        Metadata {
            timestamp: metadata.timestamp.clone(),
            tools: Tools {
                components: vec![Tool {
                    component_type: "application",
                    name: metadata.tool_name.clone(),
                    version: metadata.tool_version.clone(),
                }],
            },
            component: metadata
                .component
                .as_ref()
                .map(|c| self.build_component(c)),
            manufacture: metadata
                .manufacture
                .as_ref()
                .map(|m| self.build_entity(m)),
            licenses: self.build_licenses(&metadata.licenses),
        }
    }

    fn build_component(&self, component: &ComponentView) -> Component {
        Component {
            component_type: component.component_type.clone(),
            bom_ref: component.bom_ref.clone(),
            supplier: component.supplier.as_ref().map(|s| self.build_entity(s)),
            group: component.group.clone(),
            name: component.name.clone(),
            version: component.version.clone(),
            description: component.description.clone(),
            hashes: component
                .hashes
                .iter()
                .map(|h| Hash {
                    alg: h.algorithm.clone(),
                    content: h.value.clone(),
                })
                .collect(),
            licenses: self.build_licenses(&component.licenses),
            purl: component.purl.clone(),
            external_references: component
                .external_references
                .iter()
                .map(|r| ExternalReference {
                    reference_type: r.reference_type.clone(),
                    url: r.url.clone(),
                })
                .collect(),
            properties: component
                .properties
                .iter()
                .map(|p| Property {
                    name: p.name.clone(),
                    value: p.value.clone(),
                })
                .collect(),
        }
    }

    fn build_entity(&self, supplier: &SupplierView) -> OrganizationalEntity {
        OrganizationalEntity {
            name: supplier.name.clone(),
            url: supplier.urls.clone(),
        }
    }

    /// Licenses with neither an id nor a name cannot be expressed and are
    /// left out.
    fn build_licenses(&self, licenses: &[LicenseView]) -> Vec<License> {
        licenses
            .iter()
            .filter_map(|license| {
                let (id, name) = match (&license.spdx_id, &license.name) {
                    (Some(id), _) => (Some(id.clone()), None),
                    (None, Some(name)) => (None, Some(name.clone())),
                    (None, None) => return None,
                };
                Some(License {
                    license: LicenseContent {
                        id,
                        name,
                        text: license
                            .text
                            .as_ref()
                            .map(|content| LicenseText {
                                content: content.clone(),
                            }),
                        url: license.url.clone(),
                    },
                })
            })
            .collect()
    }

    fn build_dependencies(&self, dependencies: &[DependencyView]) -> Vec<Dependency> {
        dependencies
            .iter()
            .map(|d| Dependency {
                bom_ref: d.bom_ref.clone(),
                depends_on: d.depends_on.clone(),
            })
            .collect()
    }
}
