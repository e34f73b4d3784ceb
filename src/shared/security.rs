use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum input file size (256 MB)
///
/// Resolution exports of large multi-module builds routinely reach tens of
/// megabytes; anything past this limit is rejected before reading.
pub const MAX_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Reads a file after checking it is a regular, non-symlinked file of
/// bounded size.
///
/// # Arguments
/// * `path` - The file to read
/// * `file_description` - Human-readable name used in error messages
///
/// # Errors
/// Returns an error if the path is a symbolic link, is not a regular file,
/// exceeds `MAX_FILE_SIZE`, or cannot be read as UTF-8.
pub fn read_regular_file(path: &Path, file_description: &str) -> Result<String> {
    let metadata = fs::symlink_metadata(path).map_err(|e| SbomError::FileReadError {
        path: path.to_path_buf(),
        details: format!("Failed to read {} metadata: {}", file_description, e),
    })?;

    if metadata.is_symlink() {
        return Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} is a symbolic link", file_description),
            hint: "Pass the path of the real file instead of a link to it".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    validate_file_size(metadata.len(), path, MAX_FILE_SIZE)?;

    fs::read_to_string(path).map_err(|e| {
        SbomError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        }
        .into()
    })
}

/// Rejects files larger than `max_size` bytes.
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        return Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: format!(
                "File is too large ({} bytes). Maximum allowed size is {} bytes.",
                file_size, max_size
            ),
            hint: "Split the build into smaller exports or filter scopes at export time"
                .to_string(),
        }
        .into());
    }
    Ok(())
}
