//! # Content Crate
//!
//! Aggregation and write-side orchestration of dimension content.
//!
//! A [`ContentRichEntity`](dimension::ContentRichEntity) stores one record per
//! locale and stage plus an unlocalized record per stage. This crate turns
//! those records into one merged view and back:
//!
//! - **Read path**: `ContentAggregator` loads the unlocalized and localized
//!   record and runs the `Merger` chain through `ContentMerger`
//! - **Write path**: `DimensionContentCollectionFactory` resolves or creates
//!   the records and `ContentDataMapper` applies submitted flat data
//! - **Orchestrators**: persist, copy, workflow transitions and indexing,
//!   combined behind `ContentManager`
//!
//! ## Usage
//!
//! ```rust
//! use content::{ContentManager, IndexDocument, SearchIndex, WorkflowDefinition};
//! use dimension::{ContentKind, ContentRichEntity, DimensionAttributes};
//! use fields::{Field, FieldType, FormMetadata, FormMetadataRegistry, TypedFormMetadata};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct NoIndex;
//!
//! impl SearchIndex for NoIndex {
//!     fn index(&self, _document: IndexDocument) -> content::Result<()> {
//!         Ok(())
//!     }
//!
//!     fn deindex(&self, _: &str, _: &str, _: &DimensionAttributes) -> content::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = FormMetadataRegistry::new();
//! registry
//!     .register(
//!         TypedFormMetadata::new("page")
//!             .with_form(
//!                 FormMetadata::new(
//!                     "default",
//!                     vec![Field::new("title", FieldType::TextLine, "Title")],
//!                 ),
//!                 "default",
//!             )
//!             .with_default("default"),
//!     )
//!     .unwrap();
//!
//! let manager = ContentManager::with_defaults(
//!     Arc::new(registry),
//!     WorkflowDefinition::default(),
//!     Arc::new(NoIndex),
//! )
//! .unwrap();
//!
//! let mut page = ContentRichEntity::new(ContentKind::page());
//! let data = json!({"title": "Hello"});
//! let merged = manager
//!     .persist(&mut page, data.as_object().unwrap(), &DimensionAttributes::draft("en"))
//!     .unwrap();
//!
//! assert_eq!(merged.template_data().unwrap()["title"], json!("Hello"));
//! ```

pub mod aggregator;
pub mod copier;
pub mod error;
pub mod factory;
pub mod hashing;
pub mod indexer;
pub mod manager;
pub mod mapper;
pub mod merger;
pub mod normalizer;
pub mod persister;
pub mod repository;
pub mod workflow;

pub use aggregator::ContentAggregator;
pub use copier::ContentCopier;
pub use error::{ContentError, WorkflowError};
pub use factory::DimensionContentCollectionFactory;
pub use hashing::{generate_content_hash, has_content_changed};
pub use indexer::{ContentIndexer, IndexDocument, SearchIndex};
pub use manager::ContentManager;
pub use mapper::{ContentDataMapper, DataMapper};
pub use merger::{default_mergers, ContentMerger, Merger};
pub use normalizer::ContentNormalizer;
pub use persister::ContentPersister;
pub use repository::{DimensionContentRepository, EntityDimensionContentRepository};
pub use workflow::{ContentWorkflow, Transition, TransitionEffect, WorkflowDefinition};

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;
