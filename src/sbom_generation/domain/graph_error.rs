use super::{ComponentKey, HashAlgorithm, PackageType};
use std::fmt;
use thiserror::Error;

/// Errors that abort the graph walk of a single module.
///
/// They never cross module boundaries: the failing module is left out of
/// the aggregate and reported in the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Dependency cycle in module '{module}', scope '{scope}': {path}")]
    Cycle {
        module: String,
        scope: String,
        path: String,
    },

    #[error("Module '{module}', scope '{scope}' references unknown node id '{id}'")]
    UnknownNode {
        module: String,
        scope: String,
        id: String,
    },

    #[error("Invalid component identity in module '{module}': {details}")]
    InvalidIdentity { module: String, details: String },

    #[error("Inconsistent graph state in module '{module}': {details}")]
    Inconsistent { module: String, details: String },
}

/// Non-fatal diagnostics collected while building and merging graphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphWarning {
    /// A second hash for an algorithm already present; the first is kept
    HashConflict {
        component: ComponentKey,
        algorithm: HashAlgorithm,
        kept: String,
        rejected: String,
    },
    /// Same identity claimed with a different package type
    TypeConflict {
        component: ComponentKey,
        kept: PackageType,
        rejected: PackageType,
    },
    /// The resolver could not obtain this dependency
    Unresolved {
        component: ComponentKey,
        module: String,
        scope: String,
    },
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphWarning::HashConflict {
                component,
                algorithm,
                kept,
                rejected,
            } => write!(
                f,
                "Conflicting {} hash for {}: keeping {}, ignoring {}",
                algorithm, component, kept, rejected
            ),
            GraphWarning::TypeConflict {
                component,
                kept,
                rejected,
            } => write!(
                f,
                "Conflicting package type for {}: keeping {}, ignoring {}",
                component, kept, rejected
            ),
            GraphWarning::Unresolved {
                component,
                module,
                scope,
            } => write!(
                f,
                "Unresolved dependency {} in module '{}', scope '{}'",
                component, module, scope
            ),
        }
    }
}
