/// Domain layer - graph model, merge policies and pure services
///
/// Nothing in this layer performs I/O; adapters feed it through the ports.
pub mod domain;
pub mod policies;
pub mod services;
