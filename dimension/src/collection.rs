use crate::attributes::{AttributeFilter, DimensionAttributes};
use crate::dimension_content::DimensionContent;
use crate::kind::ContentKind;

/// Ordered, immutable group of dimension contents of one entity.
///
/// Records are kept unlocalized-first; relative order is otherwise
/// preserved. Mergers rely on this: later records override earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionContentCollection {
    contents: Vec<DimensionContent>,
    attributes: DimensionAttributes,
    kind: ContentKind,
}

impl DimensionContentCollection {
    pub fn new(
        mut contents: Vec<DimensionContent>,
        attributes: DimensionAttributes,
        kind: ContentKind,
    ) -> Self {
        // stable: keeps the caller's order among records of the same group
        contents.sort_by_key(|c| c.locale().is_some());
        Self {
            contents,
            attributes,
            kind,
        }
    }

    /// First record matching every key of the filter.
    ///
    /// With more than one compatible record the first one in collection
    /// order wins.
    pub fn get_dimension_content(&self, filter: &AttributeFilter) -> Option<&DimensionContent> {
        self.contents.iter().find(|c| filter.matches(c.attributes()))
    }

    /// The attributes this collection was built for
    pub fn dimension_attributes(&self) -> &DimensionAttributes {
        &self.attributes
    }

    /// Kind every record of this collection belongs to
    pub fn content_kind(&self) -> &ContentKind {
        &self.kind
    }

    pub fn unlocalized(&self) -> Option<&DimensionContent> {
        self.get_dimension_content(&AttributeFilter::new().unlocalized())
    }

    /// Record for the requested locale, if the collection was built for one
    pub fn localized(&self) -> Option<&DimensionContent> {
        let locale = self.attributes.locale()?;
        self.get_dimension_content(&AttributeFilter::new().locale(Some(locale)))
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DimensionContent> {
        self.contents.iter()
    }

    pub fn first(&self) -> Option<&DimensionContent> {
        self.contents.first()
    }

    pub fn into_contents(self) -> Vec<DimensionContent> {
        self.contents
    }
}

impl<'a> IntoIterator for &'a DimensionContentCollection {
    type Item = &'a DimensionContent;
    type IntoIter = std::slice::Iter<'a, DimensionContent>;

    fn into_iter(self) -> Self::IntoIter {
        self.contents.iter()
    }
}
