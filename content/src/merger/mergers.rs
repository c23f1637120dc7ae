//! One merger per dimension content concern

use super::Merger;
use dimension::DimensionContent;

/// Ghost locale and available locales
#[derive(Debug, Default, Clone, Copy)]
pub struct DimensionContentMerger;

impl Merger for DimensionContentMerger {
    fn merge(&self, target: &mut DimensionContent, source: &DimensionContent) {
        if let Some(ghost_locale) = source.ghost_locale() {
            target.set_ghost_locale(Some(ghost_locale));
        }
        for locale in source.available_locales() {
            target.add_available_locale(locale);
        }
    }
}

/// Template key and template data, layered key by key
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateMerger;

impl Merger for TemplateMerger {
    fn merge(&self, target: &mut DimensionContent, source: &DimensionContent) {
        let (Some(target), Some(source)) = (target.template_mut(), source.template()) else {
            return;
        };

        if let Some(key) = &source.template_key {
            target.template_key = Some(key.clone());
        }
        for (name, value) in &source.data {
            target.data.insert(name.clone(), value.clone());
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WorkflowMerger;

impl Merger for WorkflowMerger {
    fn merge(&self, target: &mut DimensionContent, source: &DimensionContent) {
        let (Some(target), Some(source)) = (target.workflow_mut(), source.workflow()) else {
            return;
        };

        if let Some(place) = &source.place {
            target.place = Some(place.clone());
        }
        if let Some(published) = source.published {
            target.published = Some(published);
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ExcerptMerger;

impl Merger for ExcerptMerger {
    fn merge(&self, target: &mut DimensionContent, source: &DimensionContent) {
        let (Some(target), Some(source)) = (target.excerpt_mut(), source.excerpt()) else {
            return;
        };

        merge_option(&mut target.title, &source.title);
        merge_option(&mut target.more, &source.more);
        merge_option(&mut target.description, &source.description);
        merge_option(&mut target.image, &source.image);
        merge_option(&mut target.icon, &source.icon);
        if !source.categories.is_empty() {
            target.categories = source.categories.clone();
        }
        if !source.tags.is_empty() {
            target.tags = source.tags.clone();
        }
    }
}

/// SEO fields; flags only propagate when set
#[derive(Debug, Default, Clone, Copy)]
pub struct SeoMerger;

impl Merger for SeoMerger {
    fn merge(&self, target: &mut DimensionContent, source: &DimensionContent) {
        let (Some(target), Some(source)) = (target.seo_mut(), source.seo()) else {
            return;
        };

        merge_option(&mut target.title, &source.title);
        merge_option(&mut target.description, &source.description);
        merge_option(&mut target.keywords, &source.keywords);
        merge_option(&mut target.canonical_url, &source.canonical_url);
        target.no_index |= source.no_index;
        target.no_follow |= source.no_follow;
        target.hide_in_sitemap |= source.hide_in_sitemap;
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorMerger;

impl Merger for AuthorMerger {
    fn merge(&self, target: &mut DimensionContent, source: &DimensionContent) {
        let (Some(target), Some(source)) = (target.author_mut(), source.author()) else {
            return;
        };

        merge_option(&mut target.author, &source.author);
        merge_option(&mut target.authored, &source.authored);
    }
}

fn merge_option<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if let Some(value) = source {
        *target = Some(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimension::{ContentKind, ContentRichEntity, DimensionAttributes};
    use serde_json::json;

    fn pair() -> (DimensionContent, DimensionContent) {
        let entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        (
            entity.create_dimension_content(DimensionAttributes::default()),
            entity.create_dimension_content(DimensionAttributes::draft("en")),
        )
    }

    #[test]
    fn test_template_merger_layers_data() {
        let (mut target, mut source) = pair();
        let template = target.template_mut().unwrap();
        template.template_key = Some("default".to_string());
        template.data.insert("title".to_string(), json!("Old"));
        template.data.insert("layout".to_string(), json!("wide"));

        source
            .template_mut()
            .unwrap()
            .data
            .insert("title".to_string(), json!("New"));

        TemplateMerger.merge(&mut target, &source);

        let merged = target.template().unwrap();
        assert_eq!(merged.template_key.as_deref(), Some("default"));
        assert_eq!(merged.data.get("title"), Some(&json!("New")));
        assert_eq!(merged.data.get("layout"), Some(&json!("wide")));
    }

    #[test]
    fn test_seo_merger_keeps_flags() {
        let (mut target, mut source) = pair();
        target.seo_mut().unwrap().no_index = true;
        source.seo_mut().unwrap().title = Some("SEO".to_string());

        SeoMerger.merge(&mut target, &source);

        let seo = target.seo().unwrap();
        assert!(seo.no_index);
        assert_eq!(seo.title.as_deref(), Some("SEO"));
    }

    #[test]
    fn test_excerpt_merger_ignores_empty_lists() {
        let (mut target, source) = pair();
        target.excerpt_mut().unwrap().categories = vec![1, 2];

        ExcerptMerger.merge(&mut target, &source);

        assert_eq!(target.excerpt().unwrap().categories, vec![1, 2]);
    }

    #[test]
    fn test_missing_capability_is_skipped() {
        let page = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        let snippet = ContentRichEntity::with_id(ContentKind::snippet(), "snippet-1");

        let mut target = snippet.create_dimension_content(DimensionAttributes::default());
        let mut source = page.create_dimension_content(DimensionAttributes::draft("en"));
        source.seo_mut().unwrap().title = Some("ignored".to_string());

        SeoMerger.merge(&mut target, &source);
        assert!(target.seo().is_none());
    }

    #[test]
    fn test_dimension_content_merger() {
        let (mut target, mut source) = pair();
        source.set_ghost_locale(Some("en"));
        source.add_available_locale("en");
        target.add_available_locale("de");

        DimensionContentMerger.merge(&mut target, &source);

        assert_eq!(target.ghost_locale(), Some("en"));
        assert_eq!(target.available_locales().len(), 2);
    }
}
