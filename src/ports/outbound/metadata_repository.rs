use crate::sbom_generation::domain::{ComponentKey, MetadataSource};
use crate::shared::Result;

/// MetadataRepository port for metadata that does not travel with the
/// resolution export (user overrides, curated descriptor sets, ...)
///
/// Lookups run from the parallel module walks, so implementations must be
/// `Send + Sync`.
pub trait MetadataRepository: Send + Sync {
    /// Returns every metadata source known for the component, in the order
    /// they should be applied
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be queried
    fn lookup(&self, key: &ComponentKey) -> Result<Vec<MetadataSource>>;
}
