//! Loading dimension contents for an attribute set

use dimension::{
    AttributeFilter, ContentRichEntity, DimensionAttributes, DimensionContentCollection,
};
use tracing::debug;

/// Loads the dimension contents relevant to an attribute set.
///
/// Implementations must return every record of the requested stage whose
/// locale is either the requested one or unlocalized.
pub trait DimensionContentRepository: Send + Sync {
    fn load(
        &self,
        entity: &ContentRichEntity,
        attributes: &DimensionAttributes,
    ) -> DimensionContentCollection;
}

/// Repository reading the records an entity already holds in memory
#[derive(Debug, Default, Clone, Copy)]
pub struct EntityDimensionContentRepository;

impl DimensionContentRepository for EntityDimensionContentRepository {
    fn load(
        &self,
        entity: &ContentRichEntity,
        attributes: &DimensionAttributes,
    ) -> DimensionContentCollection {
        let stage_filter = AttributeFilter::new().stage(attributes.stage);
        let contents: Vec<_> = entity
            .find_dimension_contents(&stage_filter)
            .into_iter()
            .filter(|c| c.locale().is_none() || c.locale() == attributes.locale())
            .cloned()
            .collect();

        debug!(
            "Loaded {} dimension contents of {} for {}",
            contents.len(),
            entity.resource_ref(),
            attributes
        );

        DimensionContentCollection::new(contents, attributes.clone(), entity.kind().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimension::{ContentKind, Stage};

    #[test]
    fn test_load_filters_stage_and_locale() {
        let mut entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        for attributes in [
            DimensionAttributes::draft("en"),
            DimensionAttributes::default(),
            DimensionAttributes::draft("de"),
            DimensionAttributes::live("en"),
            DimensionAttributes::default().with_stage(Stage::Live),
        ] {
            let content = entity.create_dimension_content(attributes);
            entity.add_dimension_content(content).unwrap();
        }

        let collection =
            EntityDimensionContentRepository.load(&entity, &DimensionAttributes::draft("en"));

        let loaded: Vec<_> = collection.iter().map(|c| c.attributes().clone()).collect();
        assert_eq!(
            loaded,
            vec![DimensionAttributes::default(), DimensionAttributes::draft("en")]
        );
    }

    #[test]
    fn test_load_unlocalized_only() {
        let mut entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        for attributes in [DimensionAttributes::draft("en"), DimensionAttributes::default()] {
            let content = entity.create_dimension_content(attributes);
            entity.add_dimension_content(content).unwrap();
        }

        let collection =
            EntityDimensionContentRepository.load(&entity, &DimensionAttributes::default());
        assert_eq!(collection.len(), 1);
        assert!(collection.unlocalized().is_some());
    }
}
