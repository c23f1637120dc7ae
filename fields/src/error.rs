use thiserror::Error;

pub type Result<T> = std::result::Result<T, FieldsError>;

#[derive(Error, Debug)]
pub enum FieldsError {
    #[error("Field validation error: {0}")]
    Validation(String),

    #[error("Invalid field type: {0}")]
    InvalidType(String),

    #[error("Cardinality violation: {0}")]
    CardinalityViolation(String),

    #[error("Type conversion error: {0}")]
    TypeConversion(String),

    #[error("Form metadata not found for '{form_key}' in locale '{locale}'")]
    FormNotFound { form_key: String, locale: String },

    #[error("Metadata not found for form '{form_key}' and template '{template_key}' in locale '{locale}'")]
    MetadataNotFound {
        form_key: String,
        template_key: String,
        locale: String,
    },

    #[error("Schema parsing error: {0}")]
    SchemaParsing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    YamlParsing(#[from] serde_yaml::Error),
}
