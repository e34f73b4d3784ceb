/// Type alias for Result with anyhow::Error as the error type.
/// Used everywhere outside the per-module graph walk, which reports `GraphError`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
