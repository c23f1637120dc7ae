pub mod attributes;
pub mod collection;
pub mod dimension_content;
pub mod entity;
pub mod error;
pub mod kind;

pub use attributes::{AttributeFilter, DimensionAttributes, Stage};
pub use collection::DimensionContentCollection;
pub use dimension_content::{
    AuthorData, DimensionContent, ExcerptData, SeoData, TemplateData, WorkflowData,
};
pub use entity::ContentRichEntity;
pub use error::{DimensionError, Result};
pub use kind::{Capabilities, Capability, ContentKind, ResourceRef};
