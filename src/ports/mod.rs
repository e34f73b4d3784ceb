/// Ports module defining interfaces for hexagonal architecture
///
/// The application core drives infrastructure only through the outbound
/// ports (resolution input, metadata lookup, progress, formatting, output).
pub mod outbound;
