/// ProgressReporter port for user-facing progress output
///
/// Messages go to a side channel (stderr) so the BOM itself can be
/// written to stdout.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress through a counted task
    ///
    /// # Arguments
    /// * `current` - Items completed so far
    /// * `total` - Total items
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
