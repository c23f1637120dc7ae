use crate::attributes::{AttributeFilter, DimensionAttributes};
use crate::dimension_content::DimensionContent;
use crate::error::{DimensionError, Result};
use crate::kind::{ContentKind, ResourceRef};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ulid::Ulid;

/// A logical content item that owns its dimension contents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentRichEntity {
    kind: ContentKind,
    id: String,
    /// Optimistic locking stamp; 0 means never persisted
    #[serde(default)]
    version: i64,
    #[serde(default)]
    dimension_contents: Vec<DimensionContent>,
}

impl ContentRichEntity {
    /// Create a new entity with a generated ULID
    pub fn new(kind: ContentKind) -> Self {
        Self::with_id(kind, Ulid::new().to_string())
    }

    pub fn with_id(kind: ContentKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            version: 0,
            dimension_contents: Vec::new(),
        }
    }

    /// Rebuild an entity from storage
    pub fn restore(
        kind: ContentKind,
        id: impl Into<String>,
        version: i64,
        dimension_contents: Vec<DimensionContent>,
    ) -> Result<Self> {
        let mut entity = Self::with_id(kind, id);
        entity.version = version;
        for content in dimension_contents {
            entity.add_dimension_content(content)?;
        }
        Ok(entity)
    }

    pub fn kind(&self) -> &ContentKind {
        &self.kind
    }

    pub fn resource_key(&self) -> &str {
        &self.kind.resource_key
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    pub fn resource_ref(&self) -> ResourceRef {
        ResourceRef {
            kind: self.kind.clone(),
            id: self.id.clone(),
        }
    }

    /// Factory for dimension contents of this entity. The record is not
    /// registered; call `add_dimension_content` to attach it.
    pub fn create_dimension_content(&self, attributes: DimensionAttributes) -> DimensionContent {
        DimensionContent::new(self.resource_ref(), attributes)
    }

    /// Attach a dimension content. At most one record may exist per
    /// attribute combination.
    pub fn add_dimension_content(&mut self, content: DimensionContent) -> Result<usize> {
        if content.resource().id != self.id
            || content.resource().resource_key() != self.resource_key()
        {
            return Err(DimensionError::ForeignDimension {
                expected: self.resource_ref().to_string(),
                actual: content.resource().to_string(),
            });
        }

        if self.position(content.attributes()).is_some() {
            return Err(DimensionError::DuplicateDimension {
                resource_key: self.resource_key().to_string(),
                id: self.id.clone(),
                attributes: content.attributes().clone(),
            });
        }

        debug!(
            "Adding dimension content {} to {}",
            content.attributes(),
            self.resource_ref()
        );
        self.dimension_contents.push(content);
        Ok(self.dimension_contents.len() - 1)
    }

    pub fn dimension_contents(&self) -> &[DimensionContent] {
        &self.dimension_contents
    }

    /// Index of the record with exactly these attributes
    pub fn position(&self, attributes: &DimensionAttributes) -> Option<usize> {
        self.dimension_contents
            .iter()
            .position(|c| c.attributes() == attributes)
    }

    pub fn dimension_content(&self, attributes: &DimensionAttributes) -> Option<&DimensionContent> {
        self.position(attributes).map(|i| &self.dimension_contents[i])
    }

    pub fn dimension_content_mut(
        &mut self,
        attributes: &DimensionAttributes,
    ) -> Option<&mut DimensionContent> {
        let index = self.position(attributes)?;
        self.dimension_contents.get_mut(index)
    }

    /// All records matching a partial filter, in insertion order
    pub fn find_dimension_contents(&self, filter: &AttributeFilter) -> Vec<&DimensionContent> {
        self.dimension_contents
            .iter()
            .filter(|c| filter.matches(c.attributes()))
            .collect()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut DimensionContent> {
        self.dimension_contents.get_mut(index)
    }

    /// Borrow two distinct records mutably at once
    pub fn dimension_content_pair_mut(
        &mut self,
        first: usize,
        second: usize,
    ) -> Option<(&mut DimensionContent, &mut DimensionContent)> {
        if first == second
            || first >= self.dimension_contents.len()
            || second >= self.dimension_contents.len()
        {
            return None;
        }

        if first < second {
            let (head, tail) = self.dimension_contents.split_at_mut(second);
            Some((&mut head[first], &mut tail[0]))
        } else {
            let (head, tail) = self.dimension_contents.split_at_mut(first);
            Some((&mut tail[0], &mut head[second]))
        }
    }

    /// Remove every record matching the filter; returns how many were removed
    pub fn remove_dimension_contents(&mut self, filter: &AttributeFilter) -> usize {
        let before = self.dimension_contents.len();
        self.dimension_contents
            .retain(|c| !filter.matches(c.attributes()));
        let removed = before - self.dimension_contents.len();
        if removed > 0 {
            debug!("Removed {} dimension contents from {}", removed, self.resource_ref());
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Stage;

    #[test]
    fn test_new_entity_has_ulid() {
        let entity = ContentRichEntity::new(ContentKind::page());
        assert_eq!(entity.id().len(), 26);
        assert_eq!(entity.version(), 0);
        assert!(entity.dimension_contents().is_empty());
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        let draft = entity.create_dimension_content(DimensionAttributes::draft("en"));
        entity.add_dimension_content(draft.clone()).unwrap();

        assert!(matches!(
            entity.add_dimension_content(draft),
            Err(DimensionError::DuplicateDimension { .. })
        ));
        assert_eq!(entity.dimension_contents().len(), 1);
    }

    #[test]
    fn test_add_rejects_foreign_records() {
        let mut entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        let other = ContentRichEntity::with_id(ContentKind::page(), "page-2");

        let foreign = other.create_dimension_content(DimensionAttributes::draft("en"));
        assert!(matches!(
            entity.add_dimension_content(foreign),
            Err(DimensionError::ForeignDimension { .. })
        ));
    }

    #[test]
    fn test_pair_mut() {
        let mut entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        let unlocalized = entity.create_dimension_content(DimensionAttributes::default());
        let localized = entity.create_dimension_content(DimensionAttributes::draft("en"));
        let u = entity.add_dimension_content(unlocalized).unwrap();
        let l = entity.add_dimension_content(localized).unwrap();

        let (first, second) = entity.dimension_content_pair_mut(l, u).unwrap();
        assert_eq!(first.locale(), Some("en"));
        assert_eq!(second.locale(), None);
        second.add_available_locale("en");

        assert!(entity.dimension_content_pair_mut(u, u).is_none());
        assert!(entity.dimension_content_pair_mut(u, 7).is_none());
        assert!(entity
            .dimension_content(&DimensionAttributes::default())
            .unwrap()
            .available_locales()
            .contains("en"));
    }

    #[test]
    fn test_remove_by_filter() {
        let mut entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        for attributes in [
            DimensionAttributes::default(),
            DimensionAttributes::draft("en"),
            DimensionAttributes::live("en"),
            DimensionAttributes::live("de"),
        ] {
            let content = entity.create_dimension_content(attributes);
            entity.add_dimension_content(content).unwrap();
        }

        let removed = entity.remove_dimension_contents(&AttributeFilter::new().stage(Stage::Live));
        assert_eq!(removed, 2);
        assert_eq!(entity.dimension_contents().len(), 2);
    }

    #[test]
    fn test_restore() {
        let entity = ContentRichEntity::with_id(ContentKind::snippet(), "snippet-1");
        let draft = entity.create_dimension_content(DimensionAttributes::draft("en"));

        let restored =
            ContentRichEntity::restore(ContentKind::snippet(), "snippet-1", 4, vec![draft])
                .unwrap();
        assert_eq!(restored.version(), 4);
        assert_eq!(restored.dimension_contents().len(), 1);
    }
}
