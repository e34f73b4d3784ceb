use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow build pipelines to tell a partial aggregate apart
/// from a complete one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every participating module produced a graph
    Success = 0,
    /// A BOM was written, but at least one module was excluded after an error
    ModulesFailed = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (no usable graph, I/O error, bad config, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ModulesFailed => write!(f, "Modules Failed (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for SBOM generation.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("Resolution export not found: {path}\n\n💡 Hint: {suggestion}")]
    ResolutionNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse resolution export: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file is a JSON dependency-resolution export")]
    ResolutionParseError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },

    /// Validation error for options and filter patterns
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("No module produced a usable dependency graph ({failed} failed, {skipped} skipped)\n\n💡 Hint: Re-run with --verbose to see why each module was rejected")]
    NoUsableGraph { failed: usize, skipped: usize },

    #[error("Dependency cycle across modules: {path}\n\n💡 Hint: Two modules record opposite dependency directions; check their resolved graphs")]
    DependencyCycle { path: String },

    #[error("Duplicate bom-ref '{bom_ref}' assigned to two different components")]
    DuplicateBomRef { bom_ref: String },

    #[error("Dependency edge references a component missing from the graph: {parent} -> {child}")]
    DanglingEdge { parent: String, child: String },
}
