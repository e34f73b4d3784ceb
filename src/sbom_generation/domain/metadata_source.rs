use super::{ComponentHash, ExternalReference, License, Supplier};
use serde::Deserialize;

/// One description of a component's metadata: a POM-equivalent descriptor,
/// an annotation carried on a resolved node, or a user override.
///
/// `authoritative` sources win over everything else regardless of the
/// order in which they are applied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetadataSource {
    pub authoritative: bool,
    pub licenses: Vec<License>,
    pub supplier: Option<Supplier>,
    pub hashes: Vec<ComponentHash>,
    pub external_references: Vec<ExternalReference>,
    pub description: Option<String>,
}

impl MetadataSource {
    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
            && self.supplier.as_ref().map_or(true, |s| s.is_empty())
            && self.hashes.is_empty()
            && self.external_references.is_empty()
            && self.description.as_deref().map_or(true, |d| d.trim().is_empty())
    }
}
