use resolved_sbom::prelude::*;
use std::collections::HashMap;

/// Mock MetadataRepository keyed by `group:name:version`
#[derive(Default)]
pub struct MockMetadataRepository {
    sources: HashMap<String, MetadataSource>,
    failing: Option<String>,
}

impl MockMetadataRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, coordinates: &str, source: MetadataSource) -> Self {
        self.sources.insert(coordinates.to_string(), source);
        self
    }

    /// Lookups for `coordinates` return an error
    pub fn failing_for(mut self, coordinates: &str) -> Self {
        self.failing = Some(coordinates.to_string());
        self
    }
}

impl MetadataRepository for MockMetadataRepository {
    fn lookup(&self, key: &ComponentKey) -> Result<Vec<MetadataSource>> {
        let coordinates = key.coordinates();
        if self.failing.as_deref() == Some(coordinates.as_str()) {
            anyhow::bail!("Mock failure: repository unavailable");
        }
        Ok(self.sources.get(&coordinates).cloned().into_iter().collect())
    }
}
