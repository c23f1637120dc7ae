//! Error types for content operations

use dimension::{DimensionAttributes, DimensionError};
use fields::FieldsError;
use thiserror::Error;

/// Errors raised by workflow definitions and transitions
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// The workflow does not define a transition with this name
    #[error("Transition '{transition}' is not defined in workflow '{workflow}'")]
    UnknownTransition { transition: String, workflow: String },

    /// The transition exists but cannot fire from the current place
    #[error("Transition '{transition}' is not allowed from place '{place}'")]
    TransitionNotAllowed { transition: String, place: String },

    /// The workflow configuration is inconsistent
    #[error("Invalid workflow definition: {0}")]
    InvalidDefinition(String),
}

/// Errors that can occur during content operations
#[derive(Error, Debug)]
pub enum ContentError {
    /// Merging requires at least one record
    #[error("Expected at least one dimensionContent given.")]
    EmptyCollection,

    /// No dimension content exists for the requested attributes
    #[error("Content not found for {resource_key} '{id}' with attributes {attributes}")]
    ContentNotFound {
        resource_key: String,
        id: String,
        attributes: DimensionAttributes,
    },

    /// An operation needs a capability the content kind does not have
    #[error("{resource_key} dimension content does not support the '{capability}' capability")]
    UnsupportedCapability {
        capability: String,
        resource_key: String,
    },

    /// Submitted data has the wrong shape
    #[error("Invalid value for '{key}': {message}")]
    InvalidData { key: String, message: String },

    /// Template metadata lookup or value validation failed
    #[error(transparent)]
    Metadata(#[from] FieldsError),

    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The search index collaborator failed
    #[error("Search index error: {0}")]
    Index(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ContentError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ContentError::InvalidData {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error is a missing template metadata lookup
    pub fn is_metadata_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::Metadata(
                FieldsError::MetadataNotFound { .. } | FieldsError::FormNotFound { .. }
            )
        )
    }
}
