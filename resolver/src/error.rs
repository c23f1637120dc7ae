//! Error types for view resolution

use fields::FieldsError;
use thiserror::Error;

/// Result type for resolver operations
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Errors that stop a view from being resolved.
///
/// References that cannot be resolved are not errors; they resolve to null.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// A resolver was invoked on content lacking its capability
    #[error("{resource_key} dimension content does not support the '{capability}' capability required by the {resolver} resolver")]
    UnsupportedCapability {
        resolver: String,
        capability: String,
        resource_key: String,
    },

    #[error("Template content of {resource_key} '{id}' has no template key")]
    MissingTemplate { resource_key: String, id: String },

    #[error(transparent)]
    Metadata(#[from] FieldsError),

    /// A resource loader failed as a whole
    #[error("Resource loader '{loader_key}' failed: {message}")]
    Loader { loader_key: String, message: String },
}
