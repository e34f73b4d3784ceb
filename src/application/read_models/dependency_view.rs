//! Dependency view structs for read model
//!
//! These structs provide a query-optimized view of dependency relationships.

/// Outgoing edges of one component, in emitted component order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyView {
    pub bom_ref: String,
    /// bom-refs of direct dependencies
    pub depends_on: Vec<String>,
}
