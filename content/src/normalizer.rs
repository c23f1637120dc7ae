//! Flattening dimension content into the map the data mappers accept

use dimension::DimensionContent;
use serde_json::{json, Map, Value};

/// Keys describing where a record lives rather than what it says
pub const SYSTEM_KEYS: &[&str] = &[
    "id",
    "resourceKey",
    "locale",
    "stage",
    "ghostLocale",
    "availableLocales",
    "workflowPlace",
];

/// Flattens a dimension content into one map.
///
/// The output uses the same keys the data mappers read, so normalized
/// content can be persisted again. Template fields share the top level with
/// the system keys; a system key wins over a template field of the same name.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentNormalizer;

impl ContentNormalizer {
    pub fn normalize(&self, content: &DimensionContent) -> Map<String, Value> {
        let mut normalized = Map::new();

        if let Some(template) = content.template() {
            normalized.extend(template.data.clone());
            normalized.insert("template".to_string(), json!(template.template_key));
        }

        if let Some(workflow) = content.workflow() {
            normalized.insert("workflowPlace".to_string(), json!(workflow.place));
            normalized.insert(
                "published".to_string(),
                json!(workflow.published.map(|p| p.to_rfc3339())),
            );
        }

        if let Some(excerpt) = content.excerpt() {
            normalized.insert("excerptTitle".to_string(), json!(excerpt.title));
            normalized.insert("excerptMore".to_string(), json!(excerpt.more));
            normalized.insert("excerptDescription".to_string(), json!(excerpt.description));
            normalized.insert("excerptCategories".to_string(), json!(excerpt.categories));
            normalized.insert("excerptTags".to_string(), json!(excerpt.tags));
            normalized.insert("excerptImage".to_string(), media(excerpt.image));
            normalized.insert("excerptIcon".to_string(), media(excerpt.icon));
        }

        if let Some(seo) = content.seo() {
            normalized.insert("seoTitle".to_string(), json!(seo.title));
            normalized.insert("seoDescription".to_string(), json!(seo.description));
            normalized.insert("seoKeywords".to_string(), json!(seo.keywords));
            normalized.insert("seoCanonicalUrl".to_string(), json!(seo.canonical_url));
            normalized.insert("seoNoIndex".to_string(), json!(seo.no_index));
            normalized.insert("seoNoFollow".to_string(), json!(seo.no_follow));
            normalized.insert("seoHideInSitemap".to_string(), json!(seo.hide_in_sitemap));
        }

        if let Some(author) = content.author() {
            normalized.insert("author".to_string(), json!(author.author));
            normalized.insert(
                "authored".to_string(),
                json!(author.authored.map(|a| a.to_rfc3339())),
            );
        }

        normalized.insert("id".to_string(), json!(content.resource().id));
        normalized.insert(
            "resourceKey".to_string(),
            json!(content.resource().resource_key()),
        );
        normalized.insert("locale".to_string(), json!(content.locale()));
        normalized.insert("stage".to_string(), json!(content.stage().as_str()));
        normalized.insert("ghostLocale".to_string(), json!(content.ghost_locale()));
        normalized.insert(
            "availableLocales".to_string(),
            json!(content.available_locales()),
        );

        normalized
    }
}

fn media(id: Option<i64>) -> Value {
    match id {
        Some(id) => json!({ "id": id }),
        None => Value::Null,
    }
}
