use super::scm_url::ScmUrlConverter;
use crate::sbom_generation::domain::{
    Component, ComponentHash, ExternalReference, ExternalReferenceType, GraphWarning, License,
    MetadataSource, Supplier,
};
use crate::sbom_generation::policies::LicenseMergePolicy;

/// MetadataEnricher merges metadata sources into components.
///
/// Field policies:
/// - licenses: union by identity, richer entries absorb poorer ones; an
///   authoritative license list replaces the discovered one and locks it
/// - supplier: first non-empty wins; authoritative always wins
/// - hashes: one per algorithm; a disagreeing later hash is reported and
///   dropped
/// - external references: set union, VCS URLs normalized
/// - description: first non-empty wins; authoritative always wins
///
/// Applying the same sources in the same order always yields the same
/// component.
pub struct MetadataEnricher;

impl MetadataEnricher {
    /// Applies one metadata source to `component`, returning any
    /// inconsistencies found.
    pub fn enrich(component: &mut Component, source: &MetadataSource) -> Vec<GraphWarning> {
        Self::merge_licenses(component, &source.licenses, source.authoritative);
        if let Some(supplier) = &source.supplier {
            Self::merge_supplier(component, supplier, source.authoritative);
        }
        Self::merge_external_references(component, &source.external_references);
        if let Some(description) = &source.description {
            Self::merge_description(component, description, source.authoritative);
        }
        Self::merge_hashes(component, &source.hashes)
    }

    /// Folds `other`, the same component as seen by another module, into
    /// `target`.
    pub fn merge_component(target: &mut Component, other: &Component) -> Vec<GraphWarning> {
        let mut warnings = Vec::new();

        if !target.observe_package_type(other.package_type()) {
            warnings.push(GraphWarning::TypeConflict {
                component: target.key().clone(),
                kept: target.package_type(),
                rejected: other.package_type(),
            });
        }
        target.merge_conflicting_types(other.conflicting_types());

        for scope in other.scopes() {
            target.add_scope(scope.clone());
        }
        target.observe_resolution(other.is_unresolved());
        target.observe_discovery(other.discovered_at());

        Self::merge_licenses(target, other.licenses(), other.licenses_authoritative());
        if let Some(supplier) = other.supplier() {
            Self::merge_supplier(target, supplier, other.supplier_authoritative());
        }
        Self::merge_external_references(target, other.external_references());
        if let Some(description) = other.description() {
            Self::merge_description(target, description, false);
        }

        let hashes: Vec<ComponentHash> = other
            .hashes()
            .iter()
            .map(|(algorithm, value)| ComponentHash::new(*algorithm, value))
            .collect();
        warnings.extend(Self::merge_hashes(target, &hashes));
        warnings
    }

    fn merge_licenses(component: &mut Component, licenses: &[License], authoritative: bool) {
        if licenses.is_empty() {
            return;
        }

        if authoritative && !component.licenses_authoritative() {
            component.licenses_mut().clear();
            component.lock_licenses();
        } else if !authoritative && component.licenses_authoritative() {
            return;
        }

        let list = component.licenses_mut();
        for license in licenses {
            LicenseMergePolicy::merge_into(list, license);
        }
    }

    fn merge_supplier(component: &mut Component, supplier: &Supplier, authoritative: bool) {
        if supplier.is_empty() {
            return;
        }
        let replace = match (component.supplier(), component.supplier_authoritative()) {
            (None, _) => true,
            (Some(_), false) => authoritative,
            (Some(_), true) => false,
        };
        if replace {
            component.set_supplier(supplier.clone(), authoritative);
        }
    }

    fn merge_hashes(component: &mut Component, hashes: &[ComponentHash]) -> Vec<GraphWarning> {
        let mut warnings = Vec::new();
        for hash in hashes {
            let value = hash.value.trim().to_ascii_lowercase();
            if value.is_empty() {
                continue;
            }
            match component.hashes().get(&hash.algorithm) {
                None => {
                    component.hashes_mut().insert(hash.algorithm, value);
                }
                Some(existing) if *existing == value => {}
                Some(existing) => {
                    tracing::warn!(
                        component = %component.key(),
                        algorithm = %hash.algorithm,
                        "conflicting hash values, keeping the first"
                    );
                    warnings.push(GraphWarning::HashConflict {
                        component: component.key().clone(),
                        algorithm: hash.algorithm,
                        kept: existing.clone(),
                        rejected: value,
                    });
                }
            }
        }
        warnings
    }

    fn merge_external_references(component: &mut Component, references: &[ExternalReference]) {
        for reference in references {
            let url = match reference.kind {
                ExternalReferenceType::Vcs => ScmUrlConverter::normalize(&reference.url),
                _ => reference.url.trim().to_string(),
            };
            if url.is_empty() {
                continue;
            }
            let normalized = ExternalReference::new(reference.kind, &url);
            let existing = component.external_references_mut();
            if !existing.contains(&normalized) {
                existing.push(normalized);
            }
        }
    }

    fn merge_description(component: &mut Component, description: &str, authoritative: bool) {
        let description = description.trim();
        if description.is_empty() {
            return;
        }
        if authoritative || component.description().is_none() {
            component.set_description(description.to_string());
        }
    }
}
