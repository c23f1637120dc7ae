//! Write-side setup of the records a save touches

use crate::mapper::ContentDataMapper;
use crate::repository::DimensionContentRepository;
use crate::Result;
use dimension::{
    AttributeFilter, ContentRichEntity, DimensionAttributes, DimensionContentCollection,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

pub struct DimensionContentCollectionFactory {
    repository: Arc<dyn DimensionContentRepository>,
    data_mapper: Arc<ContentDataMapper>,
}

impl DimensionContentCollectionFactory {
    pub fn new(
        repository: Arc<dyn DimensionContentRepository>,
        data_mapper: Arc<ContentDataMapper>,
    ) -> Self {
        Self {
            repository,
            data_mapper,
        }
    }

    /// Resolve or create the unlocalized and the localized record for the
    /// attributes, map `data` onto them and return both as a collection.
    ///
    /// Records are only created when the repository has none for the exact
    /// attribute set. A new localized record registers its locale on the
    /// unlocalized record and becomes the ghost locale if none is set yet.
    ///
    /// When mapping fails the entity is left exactly as it was passed in.
    pub fn create(
        &self,
        entity: &mut ContentRichEntity,
        attributes: &DimensionAttributes,
        data: &Map<String, Value>,
    ) -> Result<DimensionContentCollection> {
        let snapshot = entity.clone();
        let result = self.create_records(entity, attributes, data);
        if result.is_err() {
            debug!("Rolling back {} after failed mapping", entity.resource_ref());
            *entity = snapshot;
        }
        result
    }

    fn create_records(
        &self,
        entity: &mut ContentRichEntity,
        attributes: &DimensionAttributes,
        data: &Map<String, Value>,
    ) -> Result<DimensionContentCollection> {
        let loaded = self.repository.load(entity, attributes);
        let attributes = loaded.dimension_attributes().clone();

        let (unlocalized, _) = Self::resolve(entity, &loaded, attributes.unlocalized())?;

        let localized = match attributes.locale() {
            Some(locale) => {
                let (index, created) = Self::resolve(entity, &loaded, attributes.clone())?;
                if let Some(record) = entity.get_mut(unlocalized) {
                    record.add_available_locale(locale);
                    if created && record.set_ghost_locale_if_absent(locale) {
                        debug!("Ghost locale of {} set to {}", record.resource(), locale);
                    }
                }
                Some(index)
            }
            None => None,
        };

        match localized {
            Some(localized) => {
                if let Some((unlocalized, localized)) =
                    entity.dimension_content_pair_mut(unlocalized, localized)
                {
                    self.data_mapper.map(unlocalized, Some(localized), data)?;
                }
            }
            None => {
                if let Some(unlocalized) = entity.get_mut(unlocalized) {
                    self.data_mapper.map(unlocalized, None, data)?;
                }
            }
        }

        let contents = std::iter::once(unlocalized)
            .chain(localized)
            .filter_map(|index| entity.dimension_contents().get(index).cloned())
            .collect();

        Ok(DimensionContentCollection::new(
            contents,
            attributes,
            entity.kind().clone(),
        ))
    }

    /// Index of the record for exactly these attributes, and whether it was
    /// created by this call
    fn resolve(
        entity: &mut ContentRichEntity,
        loaded: &DimensionContentCollection,
        attributes: DimensionAttributes,
    ) -> Result<(usize, bool)> {
        if let Some(index) = entity.position(&attributes) {
            return Ok((index, false));
        }

        let filter = AttributeFilter::from(&attributes);
        if let Some(existing) = loaded.get_dimension_content(&filter) {
            let index = entity.add_dimension_content(existing.clone())?;
            return Ok((index, false));
        }

        debug!(
            "Creating dimension content {} for {}",
            attributes,
            entity.resource_ref()
        );
        let content = entity.create_dimension_content(attributes);
        let index = entity.add_dimension_content(content)?;
        Ok((index, true))
    }
}
