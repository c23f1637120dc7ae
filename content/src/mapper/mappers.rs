use super::values;
use super::{localized_target, DataMapper};
use crate::Result;
use dimension::{DimensionContent, Stage};
use serde_json::{Map, Value};

/// Puts new draft records into the workflow's initial place and carries the
/// `published` timestamp onto live records.
pub struct WorkflowDataMapper {
    initial_place: String,
}

impl WorkflowDataMapper {
    pub fn new(initial_place: impl Into<String>) -> Self {
        Self {
            initial_place: initial_place.into(),
        }
    }
}

impl DataMapper for WorkflowDataMapper {
    fn map(
        &self,
        unlocalized: &mut DimensionContent,
        localized: Option<&mut DimensionContent>,
        data: &Map<String, Value>,
    ) -> Result<()> {
        let target = localized_target(unlocalized, localized);
        let stage = target.stage();
        let Some(workflow) = target.workflow_mut() else {
            return Ok(());
        };

        match stage {
            Stage::Draft => {
                if workflow.place.is_none() {
                    workflow.place = Some(self.initial_place.clone());
                }
            }
            Stage::Live => {
                if let Some(published) = values::datetime(data, "published")? {
                    workflow.published = published;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ExcerptDataMapper;

impl DataMapper for ExcerptDataMapper {
    fn map(
        &self,
        unlocalized: &mut DimensionContent,
        localized: Option<&mut DimensionContent>,
        data: &Map<String, Value>,
    ) -> Result<()> {
        let Some(excerpt) = localized_target(unlocalized, localized).excerpt_mut() else {
            return Ok(());
        };

        if let Some(title) = values::string(data, "excerptTitle")? {
            excerpt.title = title;
        }
        if let Some(more) = values::string(data, "excerptMore")? {
            excerpt.more = more;
        }
        if let Some(description) = values::string(data, "excerptDescription")? {
            excerpt.description = description;
        }
        if let Some(categories) = values::id_list(data, "excerptCategories")? {
            excerpt.categories = categories;
        }
        if let Some(tags) = values::string_list(data, "excerptTags")? {
            excerpt.tags = tags;
        }
        if let Some(image) = values::media_id(data, "excerptImage")? {
            excerpt.image = image;
        }
        if let Some(icon) = values::media_id(data, "excerptIcon")? {
            excerpt.icon = icon;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SeoDataMapper;

impl DataMapper for SeoDataMapper {
    fn map(
        &self,
        unlocalized: &mut DimensionContent,
        localized: Option<&mut DimensionContent>,
        data: &Map<String, Value>,
    ) -> Result<()> {
        let Some(seo) = localized_target(unlocalized, localized).seo_mut() else {
            return Ok(());
        };

        if let Some(title) = values::string(data, "seoTitle")? {
            seo.title = title;
        }
        if let Some(description) = values::string(data, "seoDescription")? {
            seo.description = description;
        }
        if let Some(keywords) = values::string(data, "seoKeywords")? {
            seo.keywords = keywords;
        }
        if let Some(canonical_url) = values::string(data, "seoCanonicalUrl")? {
            seo.canonical_url = canonical_url;
        }
        if let Some(no_index) = values::boolean(data, "seoNoIndex")? {
            seo.no_index = no_index;
        }
        if let Some(no_follow) = values::boolean(data, "seoNoFollow")? {
            seo.no_follow = no_follow;
        }
        if let Some(hide_in_sitemap) = values::boolean(data, "seoHideInSitemap")? {
            seo.hide_in_sitemap = hide_in_sitemap;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorDataMapper;

impl DataMapper for AuthorDataMapper {
    fn map(
        &self,
        unlocalized: &mut DimensionContent,
        localized: Option<&mut DimensionContent>,
        data: &Map<String, Value>,
    ) -> Result<()> {
        let Some(author) = localized_target(unlocalized, localized).author_mut() else {
            return Ok(());
        };

        if let Some(name) = values::string(data, "author")? {
            author.author = name;
        }
        if let Some(authored) = values::datetime(data, "authored")? {
            author.authored = authored;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContentError;
    use dimension::{ContentKind, ContentRichEntity, DimensionAttributes, ExcerptData};
    use serde_json::json;

    fn records(kind: ContentKind, stage: Stage) -> (DimensionContent, DimensionContent) {
        let entity = ContentRichEntity::with_id(kind, "content-1");
        (
            entity.create_dimension_content(DimensionAttributes::default().with_stage(stage)),
            entity.create_dimension_content(DimensionAttributes::draft("en").with_stage(stage)),
        )
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_workflow_initial_place_only_once() {
        let (mut unlocalized, mut localized) = records(ContentKind::page(), Stage::Draft);
        let mapper = WorkflowDataMapper::new("unpublished");

        mapper.map(&mut unlocalized, Some(&mut localized), &Map::new()).unwrap();
        assert_eq!(localized.workflow_place(), Some("unpublished"));
        assert_eq!(unlocalized.workflow_place(), None);

        localized.workflow_mut().unwrap().place = Some("review".to_string());
        mapper.map(&mut unlocalized, Some(&mut localized), &Map::new()).unwrap();
        assert_eq!(localized.workflow_place(), Some("review"));
    }

    #[test]
    fn test_workflow_published_on_live() {
        let (mut unlocalized, mut localized) = records(ContentKind::page(), Stage::Live);

        WorkflowDataMapper::new("unpublished")
            .map(
                &mut unlocalized,
                Some(&mut localized),
                &object(json!({"published": "2024-01-02T03:04:05Z"})),
            )
            .unwrap();

        let workflow = localized.workflow().unwrap();
        assert!(workflow.place.is_none());
        assert_eq!(
            workflow.published.map(|p| p.to_rfc3339()),
            Some("2024-01-02T03:04:05+00:00".to_string())
        );
    }

    #[test]
    fn test_excerpt_fields() {
        let (mut unlocalized, mut localized) = records(ContentKind::snippet(), Stage::Draft);
        let data = object(json!({
            "excerptTitle": "Teaser",
            "excerptCategories": [3, 4],
            "excerptTags": ["news"],
            "excerptImage": {"id": 12}
        }));

        ExcerptDataMapper
            .map(&mut unlocalized, Some(&mut localized), &data)
            .unwrap();

        let excerpt = localized.excerpt().unwrap();
        assert_eq!(excerpt.title.as_deref(), Some("Teaser"));
        assert_eq!(excerpt.categories, vec![3, 4]);
        assert_eq!(excerpt.tags, vec!["news".to_string()]);
        assert_eq!(excerpt.image, Some(12));
        assert_eq!(unlocalized.excerpt().unwrap(), &ExcerptData::default());

        ExcerptDataMapper
            .map(&mut unlocalized, Some(&mut localized), &object(json!({"excerptImage": null})))
            .unwrap();
        assert_eq!(localized.excerpt().unwrap().image, None);
        assert_eq!(localized.excerpt().unwrap().title.as_deref(), Some("Teaser"));
    }

    #[test]
    fn test_seo_skipped_without_capability() {
        let (mut unlocalized, mut localized) = records(ContentKind::snippet(), Stage::Draft);

        SeoDataMapper
            .map(&mut unlocalized, Some(&mut localized), &object(json!({"seoTitle": "x"})))
            .unwrap();

        assert!(localized.seo().is_none());
    }

    #[test]
    fn test_seo_flags_and_wrong_shape() {
        let (mut unlocalized, _) = records(ContentKind::page(), Stage::Draft);

        SeoDataMapper
            .map(&mut unlocalized, None, &object(json!({"seoNoFollow": true, "seoTitle": "SEO"})))
            .unwrap();
        let seo = unlocalized.seo().unwrap();
        assert!(seo.no_follow);
        assert_eq!(seo.title.as_deref(), Some("SEO"));

        let error = SeoDataMapper
            .map(&mut unlocalized, None, &object(json!({"seoNoIndex": "yes"})))
            .unwrap_err();
        assert!(matches!(error, ContentError::InvalidData { ref key, .. } if key == "seoNoIndex"));
    }

    #[test]
    fn test_author() {
        let (mut unlocalized, mut localized) = records(ContentKind::page(), Stage::Draft);

        AuthorDataMapper
            .map(
                &mut unlocalized,
                Some(&mut localized),
                &object(json!({"author": "jane", "authored": "2024-03-01T10:00:00Z"})),
            )
            .unwrap();

        let author = localized.author().unwrap();
        assert_eq!(author.author.as_deref(), Some("jane"));
        assert!(author.authored.is_some());
    }
}
