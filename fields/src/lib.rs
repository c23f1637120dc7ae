//! Template form metadata: the property types a template is built from and
//! the registry that hands them to the content engine.

pub mod error;
pub mod field_types;
pub mod metadata;
pub mod validation;

pub use error::{FieldsError, Result};
pub use field_types::{default_multilingual, BlockType, Field, FieldType};
pub use metadata::{FormMetadata, FormMetadataRegistry, MetadataProvider, TypedFormMetadata};
pub use validation::FieldValidator;
