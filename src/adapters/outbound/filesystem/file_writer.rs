use crate::ports::outbound::OutputPresenter;
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Extension of the files written for per-document output
const BOM_FILE_SUFFIX: &str = ".cdx.json";

/// FileSystemWriter adapter for writing output to files
///
/// This adapter implements the OutputPresenter port for file output.
pub struct FileSystemWriter {
    output_path: PathBuf,
}

impl FileSystemWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    /// Writers for named documents sharing `directory`, in the order given.
    ///
    /// Module paths such as `:services:api` become `services-api.cdx.json`.
    /// A file name already taken by an earlier document, compared without
    /// case, gets a numeric suffix: `:a-b` and `:a:b` are written to
    /// `a-b.cdx.json` and `a-b-2.cdx.json`.
    pub fn for_documents(directory: &Path, document_names: &[&str]) -> Vec<Self> {
        let mut taken: HashSet<String> = HashSet::new();
        document_names
            .iter()
            .map(|name| {
                let stem = Self::file_stem(name);
                let mut candidate = stem.clone();
                let mut counter = 2;
                while !taken.insert(candidate.to_lowercase()) {
                    candidate = format!("{}-{}", stem, counter);
                    counter += 1;
                }
                Self::new(directory.join(format!("{}{}", candidate, BOM_FILE_SUFFIX)))
            })
            .collect()
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn file_stem(document_name: &str) -> String {
        let stem: String = document_name
            .trim_matches(|c: char| c == ':' || c == '/' || c.is_whitespace())
            .chars()
            .map(|c| match c {
                ':' | '/' | '\\' => '-',
                c if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' => c,
                _ => '_',
            })
            .collect();
        if stem.is_empty() || stem.chars().all(|c| c == '.') {
            "bom".to_string()
        } else {
            stem
        }
    }

    /// Validates that the parent directory exists before writing
    fn validate_parent_directory(&self) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.exists() && parent != Path::new("") {
                return Err(SbomError::FileWriteError {
                    path: self.output_path.clone(),
                    details: format!("Parent directory does not exist: {}", parent.display()),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Refuses to write through an existing symbolic link
    fn validate_output_security(&self) -> Result<()> {
        if let Ok(metadata) = fs::symlink_metadata(&self.output_path) {
            if metadata.is_symlink() {
                return Err(SbomError::SecurityError {
                    path: self.output_path.clone(),
                    reason: "Output path is a symbolic link".to_string(),
                    hint: "Write to a regular file path instead".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl OutputPresenter for FileSystemWriter {
    fn present(&self, content: &str) -> Result<()> {
        self.validate_parent_directory()?;
        self.validate_output_security()?;

        fs::write(&self.output_path, content).map_err(|e| SbomError::FileWriteError {
            path: self.output_path.clone(),
            details: e.to_string(),
        })?;

        eprintln!("✅ Output complete: {}", self.output_path.display());
        Ok(())
    }
}

/// StdoutPresenter adapter for writing output to stdout
///
/// This adapter implements the OutputPresenter port for stdout output.
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|_| stdout.write_all(b"\n"))
            .and_then(|_| stdout.flush())
            .map_err(|e| anyhow::anyhow!("Failed to write to stdout: {}", e))?;
        Ok(())
    }
}
