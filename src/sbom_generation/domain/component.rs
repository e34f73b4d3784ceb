use super::{ComponentIdentity, ComponentKey, License, PackageType};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Supplier or organization responsible for a component
///
/// Deserialization goes through `Supplier::new`, so blank names and URLs
/// never survive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "SupplierRecord")]
pub struct Supplier {
    name: Option<String>,
    urls: Vec<String>,
}

/// Wire shape of a supplier
#[derive(Deserialize)]
struct SupplierRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    urls: Vec<String>,
}

impl From<SupplierRecord> for Supplier {
    fn from(record: SupplierRecord) -> Self {
        Supplier::new(record.name, record.urls)
    }
}

impl Supplier {
    pub fn new(name: Option<String>, urls: Vec<String>) -> Self {
        Self {
            name: name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            urls: urls
                .into_iter()
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .collect(),
        }
    }

    pub fn named(name: &str) -> Self {
        Self::new(Some(name.to_string()), Vec::new())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.urls.is_empty()
    }
}

/// Hash algorithms, named as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "SHA-1")]
    Sha1,
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
    #[serde(rename = "SHA3-256")]
    Sha3_256,
    #[serde(rename = "SHA3-512")]
    Sha3_512,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
            HashAlgorithm::Sha3_256 => "SHA3-256",
            HashAlgorithm::Sha3_512 => "SHA3-512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One content hash reported by a metadata source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComponentHash {
    pub algorithm: HashAlgorithm,
    pub value: String,
}

impl ComponentHash {
    pub fn new(algorithm: HashAlgorithm, value: &str) -> Self {
        Self {
            algorithm,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExternalReferenceType {
    Vcs,
    BuildSystem,
    Website,
    Documentation,
    IssueTracker,
    Distribution,
    Other,
}

impl ExternalReferenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExternalReferenceType::Vcs => "vcs",
            ExternalReferenceType::BuildSystem => "build-system",
            ExternalReferenceType::Website => "website",
            ExternalReferenceType::Documentation => "documentation",
            ExternalReferenceType::IssueTracker => "issue-tracker",
            ExternalReferenceType::Distribution => "distribution",
            ExternalReferenceType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct ExternalReference {
    #[serde(rename = "type")]
    pub kind: ExternalReferenceType,
    pub url: String,
}

impl ExternalReference {
    pub fn new(kind: ExternalReferenceType, url: &str) -> Self {
        Self {
            kind,
            url: url.to_string(),
        }
    }
}

/// A (module, scope) pair through which a component was reached
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigurationScope {
    pub module: String,
    pub scope: String,
}

impl ConfigurationScope {
    pub fn new(module: &str, scope: &str) -> Self {
        Self {
            module: module.to_string(),
            scope: scope.to_string(),
        }
    }
}

/// Position of a component's first discovery: module index in the build,
/// then preorder sequence within that module's walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiscoveryOrder {
    pub module_index: usize,
    pub sequence: usize,
}

impl DiscoveryOrder {
    pub fn new(module_index: usize, sequence: usize) -> Self {
        Self {
            module_index,
            sequence,
        }
    }
}

/// Component entity: one resolved dependency or one module root.
///
/// Created on first encounter during a walk, then only ever enriched.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    key: ComponentKey,
    purl: String,
    package_type: PackageType,
    conflicting_types: BTreeSet<PackageType>,
    licenses: Vec<License>,
    licenses_authoritative: bool,
    supplier: Option<Supplier>,
    supplier_authoritative: bool,
    hashes: BTreeMap<HashAlgorithm, String>,
    external_references: Vec<ExternalReference>,
    description: Option<String>,
    scopes: BTreeSet<ConfigurationScope>,
    unresolved: bool,
    discovered_at: DiscoveryOrder,
}

impl Component {
    pub fn new(
        identity: ComponentIdentity,
        package_type: PackageType,
        discovered_at: DiscoveryOrder,
    ) -> Self {
        let (key, purl) = identity.into_parts();
        Self {
            key,
            purl,
            package_type,
            conflicting_types: BTreeSet::new(),
            licenses: Vec::new(),
            licenses_authoritative: false,
            supplier: None,
            supplier_authoritative: false,
            hashes: BTreeMap::new(),
            external_references: Vec::new(),
            description: None,
            scopes: BTreeSet::new(),
            unresolved: false,
            discovered_at,
        }
    }

    pub fn key(&self) -> &ComponentKey {
        &self.key
    }

    pub fn purl(&self) -> &str {
        &self.purl
    }

    pub fn package_type(&self) -> PackageType {
        self.package_type
    }

    pub fn conflicting_types(&self) -> &BTreeSet<PackageType> {
        &self.conflicting_types
    }

    pub fn licenses(&self) -> &[License] {
        &self.licenses
    }

    pub fn licenses_authoritative(&self) -> bool {
        self.licenses_authoritative
    }

    pub fn supplier(&self) -> Option<&Supplier> {
        self.supplier.as_ref()
    }

    pub fn supplier_authoritative(&self) -> bool {
        self.supplier_authoritative
    }

    pub fn hashes(&self) -> &BTreeMap<HashAlgorithm, String> {
        &self.hashes
    }

    pub fn external_references(&self) -> &[ExternalReference] {
        &self.external_references
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn scopes(&self) -> &BTreeSet<ConfigurationScope> {
        &self.scopes
    }

    pub fn is_unresolved(&self) -> bool {
        self.unresolved
    }

    pub fn discovered_at(&self) -> DiscoveryOrder {
        self.discovered_at
    }

    /// True when every scope that reached this component is a test scope.
    pub fn is_test_only(&self) -> bool {
        !self.scopes.is_empty() && self.scopes.iter().all(|s| s.scope.starts_with("test"))
    }

    /// Records another package type claim. Returns false when it disagrees
    /// with the type already held; the first type is kept.
    pub fn observe_package_type(&mut self, package_type: PackageType) -> bool {
        if package_type == self.package_type {
            return true;
        }
        self.conflicting_types.insert(package_type);
        false
    }

    pub fn add_scope(&mut self, scope: ConfigurationScope) {
        self.scopes.insert(scope);
    }

    /// A component stays unresolved only while every sighting is unresolved.
    pub fn set_unresolved(&mut self, unresolved: bool) {
        self.unresolved = unresolved;
    }

    pub fn observe_resolution(&mut self, unresolved: bool) {
        self.unresolved = self.unresolved && unresolved;
    }

    pub fn observe_discovery(&mut self, order: DiscoveryOrder) {
        self.discovered_at = self.discovered_at.min(order);
    }

    /// Removes full license texts, dropping licenses known only by text
    pub fn drop_license_texts(&mut self) {
        self.licenses = self
            .licenses
            .iter()
            .filter_map(License::without_text)
            .collect();
    }

    pub(crate) fn licenses_mut(&mut self) -> &mut Vec<License> {
        &mut self.licenses
    }

    pub(crate) fn lock_licenses(&mut self) {
        self.licenses_authoritative = true;
    }

    pub(crate) fn set_supplier(&mut self, supplier: Supplier, authoritative: bool) {
        self.supplier = Some(supplier);
        self.supplier_authoritative = authoritative;
    }

    pub(crate) fn hashes_mut(&mut self) -> &mut BTreeMap<HashAlgorithm, String> {
        &mut self.hashes
    }

    pub(crate) fn external_references_mut(&mut self) -> &mut Vec<ExternalReference> {
        &mut self.external_references
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    pub(crate) fn merge_conflicting_types(&mut self, other: &BTreeSet<PackageType>) {
        self.conflicting_types.extend(other.iter().copied());
        self.conflicting_types.remove(&self.package_type);
    }
}
