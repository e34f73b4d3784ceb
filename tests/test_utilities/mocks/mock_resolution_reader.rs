use resolved_sbom::prelude::*;
use std::path::Path;

/// Mock ResolutionReader serving a JSON export held in memory
pub struct MockResolutionReader {
    content: String,
    should_fail: bool,
}

impl MockResolutionReader {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            should_fail: false,
        }
    }

    pub fn with_failure() -> Self {
        Self {
            content: String::new(),
            should_fail: true,
        }
    }
}

impl ResolutionReader for MockResolutionReader {
    fn read_resolution(&self, path: &Path) -> Result<ResolvedBuild> {
        if self.should_fail {
            anyhow::bail!("Mock failure: cannot read {}", path.display());
        }
        Ok(serde_json::from_str(&self.content)?)
    }
}
