//! Builder for constructing SbomReadModel from domain objects
//!
//! This is the last step before serialization: it linearizes the final
//! dependency graph into an ordered component list plus one dependency entry
//! per component, assigning every bom-ref before any edge refers to it.

use super::component_view::{
    ComponentView, ExternalReferenceView, HashView, LicenseView, PropertyView, SupplierView,
};
use super::dependency_view::DependencyView;
use super::sbom_read_model::{SbomMetadataView, SbomReadModel};
use crate::application::dto::ComponentOrder;
use crate::sbom_generation::domain::{
    Component, ComponentKey, DependencyGraph, License, SbomMetadata, Supplier, UNSPECIFIED,
};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::{HashMap, HashSet};

const TEST_PROPERTY: &str = "cdx:maven:package:test";
const UNRESOLVED_PROPERTY: &str = "cdx:gradle:unresolved";
const CONFLICTING_TYPE_PROPERTY: &str = "cdx:gradle:conflictingPackageType";

/// Builder for constructing SbomReadModel from domain objects
pub struct SbomReadModelBuilder;

impl SbomReadModelBuilder {
    /// Builds a SbomReadModel from the final graph
    ///
    /// # Arguments
    /// * `graph` - Aggregated or per-module dependency graph
    /// * `metadata_component` - Component described by the document; it is
    ///   moved out of `components` into the metadata section
    /// * `metadata` - SBOM metadata (timestamp, tool info, serial number)
    /// * `order` - Canonical or first-discovery component order
    ///
    /// # Errors
    /// Returns `SbomError::DuplicateBomRef` when two components map to one
    /// bom-ref and `SbomError::DanglingEdge` when an edge points outside the
    /// component set.
    pub fn build(
        graph: &DependencyGraph,
        metadata_component: Option<&ComponentKey>,
        metadata: &SbomMetadata,
        order: ComponentOrder,
    ) -> Result<SbomReadModel> {
        let ordered = Self::order_components(graph, order);
        let bom_refs = Self::assign_bom_refs(&ordered)?;
        let positions: HashMap<&ComponentKey, usize> = ordered
            .iter()
            .enumerate()
            .map(|(index, component)| (component.key(), index))
            .collect();

        let mut components = Vec::with_capacity(ordered.len());
        let mut dependencies = Vec::with_capacity(ordered.len());
        let mut metadata_view = None;

        if let Some(key) = metadata_component {
            let component = graph
                .component(key)
                .ok_or_else(|| anyhow::anyhow!("Metadata component {} is not in the graph", key))?;
            metadata_view = Some(Self::build_component(component));
            dependencies.push(Self::build_dependency(graph, key, &bom_refs, &positions)?);
        }

        for component in &ordered {
            if Some(component.key()) == metadata_component {
                continue;
            }
            components.push(Self::build_component(component));
            dependencies.push(Self::build_dependency(
                graph,
                component.key(),
                &bom_refs,
                &positions,
            )?);
        }

        Ok(SbomReadModel {
            metadata: Self::build_metadata(metadata, metadata_view),
            components,
            dependencies,
        })
    }

    fn order_components(graph: &DependencyGraph, order: ComponentOrder) -> Vec<&Component> {
        let mut ordered: Vec<&Component> = graph.components().collect();
        if order == ComponentOrder::Declaration {
            // Stable: equal discovery positions keep canonical order
            ordered.sort_by_key(|component| component.discovered_at());
        }
        ordered
    }

    fn assign_bom_refs<'a>(
        ordered: &[&'a Component],
    ) -> Result<HashMap<&'a ComponentKey, &'a str>> {
        let mut seen = HashSet::with_capacity(ordered.len());
        let mut bom_refs = HashMap::with_capacity(ordered.len());
        for component in ordered {
            if !seen.insert(component.purl()) {
                return Err(SbomError::DuplicateBomRef {
                    bom_ref: component.purl().to_string(),
                }
                .into());
            }
            bom_refs.insert(component.key(), component.purl());
        }
        Ok(bom_refs)
    }

    fn build_dependency(
        graph: &DependencyGraph,
        parent: &ComponentKey,
        bom_refs: &HashMap<&ComponentKey, &str>,
        positions: &HashMap<&ComponentKey, usize>,
    ) -> Result<DependencyView> {
        let mut children = Vec::new();
        for child in graph.children(parent) {
            match positions.get(child) {
                Some(position) => children.push((*position, child)),
                None => {
                    return Err(SbomError::DanglingEdge {
                        parent: parent.to_string(),
                        child: child.to_string(),
                    }
                    .into())
                }
            }
        }
        children.sort_by_key(|(position, _)| *position);

        let bom_ref = Self::bom_ref(bom_refs, parent)?;
        let depends_on = children
            .into_iter()
            .map(|(_, child)| Self::bom_ref(bom_refs, child).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;

        Ok(DependencyView {
            bom_ref: bom_ref.to_string(),
            depends_on,
        })
    }

    fn bom_ref<'a>(
        bom_refs: &HashMap<&ComponentKey, &'a str>,
        key: &ComponentKey,
    ) -> Result<&'a str> {
        bom_refs
            .get(key)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("No bom-ref assigned to {}", key))
    }

    /// Converts domain metadata to view representation
    fn build_metadata(
        metadata: &SbomMetadata,
        component: Option<ComponentView>,
    ) -> SbomMetadataView {
        SbomMetadataView {
            timestamp: metadata.timestamp().to_string(),
            tool_name: metadata.tool_name().to_string(),
            tool_version: metadata.tool_version().to_string(),
            serial_number: metadata.serial_number().map(str::to_string),
            component,
            manufacture: metadata.manufacture().map(Self::build_supplier),
            licenses: metadata.licenses().iter().map(Self::build_license).collect(),
        }
    }

    fn build_component(component: &Component) -> ComponentView {
        let key = component.key();
        let group = (key.group() != UNSPECIFIED).then(|| key.group().to_string());

        ComponentView {
            bom_ref: component.purl().to_string(),
            component_type: component.package_type().as_str().to_string(),
            group,
            name: key.name().to_string(),
            version: key.version().to_string(),
            purl: component.purl().to_string(),
            licenses: component.licenses().iter().map(Self::build_license).collect(),
            supplier: component.supplier().map(Self::build_supplier),
            hashes: component
                .hashes()
                .iter()
                .map(|(algorithm, value)| HashView {
                    algorithm: algorithm.as_str().to_string(),
                    value: value.clone(),
                })
                .collect(),
            external_references: component
                .external_references()
                .iter()
                .map(|reference| ExternalReferenceView {
                    reference_type: reference.kind.as_str().to_string(),
                    url: reference.url.clone(),
                })
                .collect(),
            description: component.description().map(str::to_string),
            properties: Self::build_properties(component),
        }
    }

    fn build_properties(component: &Component) -> Vec<PropertyView> {
        let mut properties = Vec::new();
        if component.is_test_only() {
            properties.push(PropertyView {
                name: TEST_PROPERTY.to_string(),
                value: "true".to_string(),
            });
        }
        if component.is_unresolved() {
            properties.push(PropertyView {
                name: UNRESOLVED_PROPERTY.to_string(),
                value: "true".to_string(),
            });
        }
        if !component.conflicting_types().is_empty() {
            let rejected: Vec<&str> = component
                .conflicting_types()
                .iter()
                .map(|package_type| package_type.as_str())
                .collect();
            properties.push(PropertyView {
                name: CONFLICTING_TYPE_PROPERTY.to_string(),
                value: rejected.join(","),
            });
        }
        properties
    }

    fn build_license(license: &License) -> LicenseView {
        LicenseView {
            spdx_id: license.id().map(str::to_string),
            name: license.name().map(str::to_string),
            url: license.url().map(str::to_string),
            text: license.text().map(str::to_string),
        }
    }

    fn build_supplier(supplier: &Supplier) -> SupplierView {
        SupplierView {
            name: supplier.name().map(str::to_string),
            urls: supplier.urls().to_vec(),
        }
    }
}
