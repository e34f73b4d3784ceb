use crate::application::read_models::SbomReadModel;
use crate::shared::Result;

/// SbomFormatter port for rendering a BOM document
///
/// This port abstracts the wire format (CycloneDX JSON today).
pub trait SbomFormatter {
    /// Formats one BOM read model
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, model: &SbomReadModel) -> Result<String>;
}
