use crate::ports::outbound::MetadataRepository;
use crate::sbom_generation::domain::{ComponentKey, MetadataSource};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::HashMap;

/// DescriptorRepository - in-memory metadata keyed by coordinates
///
/// Entries are registered for `group:name:version` or for `group:name`,
/// which applies to every version. Versioned entries are returned after
/// unversioned ones so the more specific entry is applied last.
#[derive(Debug, Default)]
pub struct DescriptorRepository {
    entries: HashMap<String, Vec<MetadataSource>>,
}

impl DescriptorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a metadata source for a `group:name[:version]` selector
    ///
    /// # Errors
    /// Returns a validation error for selectors without a group and name or
    /// with more than three segments.
    pub fn insert(&mut self, selector: &str, source: MetadataSource) -> Result<()> {
        let key = Self::normalize_selector(selector)?;
        self.entries.entry(key).or_default().push(source);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn normalize_selector(selector: &str) -> Result<String> {
        let segments: Vec<&str> = selector.split(':').map(str::trim).collect();
        let valid = matches!(segments.len(), 2 | 3) && segments.iter().all(|s| !s.is_empty());
        if !valid {
            return Err(SbomError::Validation {
                message: format!(
                    "Invalid component selector '{}': expected group:name[:version]",
                    selector
                ),
            }
            .into());
        }
        Ok(segments.join(":"))
    }
}

impl MetadataRepository for DescriptorRepository {
    fn lookup(&self, key: &ComponentKey) -> Result<Vec<MetadataSource>> {
        let unversioned = format!("{}:{}", key.group(), key.name());
        let mut sources = Vec::new();
        for selector in [unversioned, key.coordinates()] {
            if let Some(found) = self.entries.get(&selector) {
                sources.extend(found.iter().cloned());
            }
        }
        Ok(sources)
    }
}
