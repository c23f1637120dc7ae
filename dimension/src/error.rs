use crate::DimensionAttributes;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DimensionError>;

#[derive(Error, Debug)]
pub enum DimensionError {
    #[error("Dimension content for {attributes} already exists on {resource_key} '{id}'")]
    DuplicateDimension {
        resource_key: String,
        id: String,
        attributes: DimensionAttributes,
    },

    #[error("Dimension content belongs to {actual}, expected {expected}")]
    ForeignDimension { expected: String, actual: String },

    #[error("Invalid stage: {0}")]
    InvalidStage(String),
}
