use crate::ports::outbound::ResolutionReader;
use crate::sbom_generation::domain::ResolvedBuild;
use crate::shared::error::SbomError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use std::path::{Path, PathBuf};

/// File name looked up when the input path is a directory
pub const DEFAULT_RESOLUTION_FILE: &str = "resolution.json";

/// FileSystemReader adapter for reading resolution exports from disk
///
/// The input is either the export itself or a build directory containing
/// `resolution.json`.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }

    /// Resolves the export file for an input path
    pub fn resolution_file(input: &Path) -> PathBuf {
        if input.is_dir() {
            input.join(DEFAULT_RESOLUTION_FILE)
        } else {
            input.to_path_buf()
        }
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionReader for FileSystemReader {
    fn read_resolution(&self, path: &Path) -> Result<ResolvedBuild> {
        let file = Self::resolution_file(path);

        if !file.exists() {
            return Err(SbomError::ResolutionNotFound {
                path: file,
                suggestion: format!(
                    "No resolution export found at \"{}\".\n   \
                     Export the resolved dependency graph from your build first, or pass the path of the JSON export.",
                    path.display()
                ),
            }
            .into());
        }

        let content = read_regular_file(&file, "resolution export")?;
        let build: ResolvedBuild =
            serde_json::from_str(&content).map_err(|e| SbomError::ResolutionParseError {
                path: file.clone(),
                details: e.to_string(),
            })?;

        tracing::debug!(
            path = %file.display(),
            modules = build.modules.len(),
            descriptors = build.descriptors.len(),
            "resolution export parsed"
        );
        Ok(build)
    }
}
