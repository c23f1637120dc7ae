//! Applying submitted flat data onto dimension content records

mod mappers;
mod template;
pub(crate) mod values;

pub use mappers::{AuthorDataMapper, ExcerptDataMapper, SeoDataMapper, WorkflowDataMapper};
pub use template::TemplateDataMapper;

use crate::Result;
use dimension::DimensionContent;
use fields::MetadataProvider;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Writes one concern of submitted data onto the records of a collection.
///
/// `localized` is absent when the data is saved without a locale; mappers
/// then write localized concerns onto the unlocalized record.
pub trait DataMapper: Send + Sync {
    fn map(
        &self,
        unlocalized: &mut DimensionContent,
        localized: Option<&mut DimensionContent>,
        data: &Map<String, Value>,
    ) -> Result<()>;
}

/// The record localized concerns are written to
pub(crate) fn localized_target<'a>(
    unlocalized: &'a mut DimensionContent,
    localized: Option<&'a mut DimensionContent>,
) -> &'a mut DimensionContent {
    match localized {
        Some(localized) => localized,
        None => unlocalized,
    }
}

/// Runs every registered data mapper in order
pub struct ContentDataMapper {
    mappers: Vec<Box<dyn DataMapper>>,
}

impl ContentDataMapper {
    pub fn new(mappers: Vec<Box<dyn DataMapper>>) -> Self {
        Self { mappers }
    }

    /// The standard chain: template, workflow, excerpt, SEO and author
    pub fn with_defaults(metadata: Arc<dyn MetadataProvider>, initial_place: &str) -> Self {
        Self::new(vec![
            Box::new(TemplateDataMapper::new(metadata)),
            Box::new(WorkflowDataMapper::new(initial_place)),
            Box::new(ExcerptDataMapper),
            Box::new(SeoDataMapper),
            Box::new(AuthorDataMapper),
        ])
    }

    pub fn map(
        &self,
        unlocalized: &mut DimensionContent,
        mut localized: Option<&mut DimensionContent>,
        data: &Map<String, Value>,
    ) -> Result<()> {
        for mapper in &self.mappers {
            mapper.map(unlocalized, localized.as_deref_mut(), data)?;
        }
        Ok(())
    }
}
