use crate::sbom_generation::domain::ResolvedBuild;
use crate::shared::Result;
use std::path::Path;

/// ResolutionReader port for loading the resolver's export
///
/// This port abstracts where the resolved dependency graph comes from
/// (a JSON export on disk, an in-memory fixture, ...).
pub trait ResolutionReader {
    /// Reads and parses the resolution export at `path`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The export does not exist or cannot be read
    /// - The content is not a valid resolution export
    fn read_resolution(&self, path: &Path) -> Result<ResolvedBuild>;
}
