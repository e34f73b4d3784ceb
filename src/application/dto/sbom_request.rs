use super::SbomOptions;
use std::path::PathBuf;

/// SbomRequest - Internal request DTO for the SBOM generation use case
#[derive(Debug, Clone)]
pub struct SbomRequest {
    /// Path to the resolution export
    pub input_path: PathBuf,
    pub options: SbomOptions,
}

impl SbomRequest {
    pub fn new(input_path: PathBuf, options: SbomOptions) -> Self {
        Self {
            input_path,
            options,
        }
    }
}
