use crate::application::read_models::SbomReadModel;
use std::fmt;

/// One module that was left out of the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFailure {
    pub module: String,
    pub reason: String,
}

/// Per-run outcome of every module in the resolution export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Modules whose graph made it into the output
    pub succeeded: Vec<String>,
    /// Modules excluded after an error
    pub failed: Vec<ModuleFailure>,
    /// Modules excluded by module filters
    pub skipped: Vec<String>,
    /// Non-fatal diagnostics (hash conflicts, unresolved dependencies, ...)
    pub warnings: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} module(s) succeeded, {} failed, {} skipped, {} warning(s)",
            self.succeeded.len(),
            self.failed.len(),
            self.skipped.len(),
            self.warnings
        )
    }
}

/// One emitted BOM and the name it is published under
#[derive(Debug, Clone)]
pub struct SbomDocument {
    /// Module name, or the metadata component's name for an aggregate
    pub name: String,
    pub model: SbomReadModel,
}

/// SbomResponse - Internal response DTO from the SBOM generation use case
#[derive(Debug, Clone)]
pub struct SbomResponse {
    /// One document when aggregating, one per module otherwise
    pub documents: Vec<SbomDocument>,
    pub summary: RunSummary,
}

impl SbomResponse {
    pub fn new(documents: Vec<SbomDocument>, summary: RunSummary) -> Self {
        Self { documents, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_summary_display() {
        let summary = RunSummary {
            succeeded: vec![":app".to_string()],
            failed: vec![ModuleFailure {
                module: ":lib".to_string(),
                reason: "cycle".to_string(),
            }],
            skipped: vec![],
            warnings: 2,
        };
        assert!(summary.has_failures());
        assert_eq!(
            summary.to_string(),
            "1 module(s) succeeded, 1 failed, 0 skipped, 2 warning(s)"
        );
    }
}
