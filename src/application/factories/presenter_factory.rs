use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
use crate::ports::outbound::OutputPresenter;
use std::path::PathBuf;

/// Where emitted documents go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterType {
    Stdout,
    /// A single file; only valid for a single document
    File(PathBuf),
    /// One `<document>.cdx.json` file per document
    Directory(PathBuf),
}

impl PresenterType {
    /// Whether more than one document can be written
    pub fn accepts_multiple_documents(&self) -> bool {
        matches!(self, PresenterType::Directory(_))
    }
}

/// Factory for creating output presenters
///
/// This factory encapsulates the creation logic for different presenter implementations,
/// following the Factory Pattern. It belongs in the application layer as it orchestrates
/// the selection of infrastructure adapters based on application needs.
pub struct PresenterFactory;

impl PresenterFactory {
    /// Creates one presenter per document, in document order
    ///
    /// # Arguments
    /// * `presenter_type` - The type of presenter to create
    /// * `document_names` - Module or metadata component names, used to
    ///   name the files of directory output
    pub fn create_all(
        presenter_type: &PresenterType,
        document_names: &[&str],
    ) -> Vec<Box<dyn OutputPresenter>> {
        match presenter_type {
            PresenterType::Stdout => document_names
                .iter()
                .map(|_| Box::new(StdoutPresenter::new()) as Box<dyn OutputPresenter>)
                .collect(),
            PresenterType::File(path) => document_names
                .iter()
                .map(|_| Box::new(FileSystemWriter::new(path.clone())) as Box<dyn OutputPresenter>)
                .collect(),
            PresenterType::Directory(dir) => FileSystemWriter::for_documents(dir, document_names)
                .into_iter()
                .map(|writer| Box::new(writer) as Box<dyn OutputPresenter>)
                .collect(),
        }
    }
}
