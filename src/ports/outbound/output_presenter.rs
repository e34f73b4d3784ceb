use crate::shared::Result;

/// OutputPresenter port for presenting a rendered BOM
///
/// This port abstracts the output destination (stdout, file, ...).
pub trait OutputPresenter {
    /// Presents the formatted BOM content
    ///
    /// # Errors
    /// Returns an error if writing to the destination fails
    fn present(&self, content: &str) -> Result<()>;
}
