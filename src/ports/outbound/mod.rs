/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, console, metadata stores).
pub mod formatter;
pub mod metadata_repository;
pub mod output_presenter;
pub mod progress_reporter;
pub mod resolution_reader;

pub use formatter::SbomFormatter;
pub use metadata_repository::MetadataRepository;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use resolution_reader::ResolutionReader;
