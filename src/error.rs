//! Error types for template lookup and runtime loading

use thiserror::Error;

/// Errors surfaced by template lookup and runtime lifecycle operations.
///
/// A build either fully succeeds or returns one of these; there is no
/// partial state to roll back because the registry is never mutated while
/// a build is in progress.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// No template registered for the requested type and identifier
    #[error("no template registered for type `{type_name}` under identifier {identifier:?}")]
    TemplateNotFound {
        type_name: &'static str,
        identifier: String,
    },

    /// No definition source installed under the requested name
    #[error("no definition source installed under name {name:?}")]
    SourceNotFound { name: String },
}
