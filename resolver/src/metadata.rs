use crate::property::PropertyResolverPool;
use crate::view::{Content, ContentView};
use fields::{Field, FieldType};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Maps template data onto views following the form's fields.
///
/// Non-renderable fields are skipped, section children are resolved as if
/// they were top-level fields and every block item is resolved with the
/// fields of its own block type.
#[derive(Clone)]
pub struct MetadataResolver {
    pool: Arc<PropertyResolverPool>,
}

impl MetadataResolver {
    pub fn new(pool: Arc<PropertyResolverPool>) -> Self {
        Self { pool }
    }

    pub fn resolve_items(
        &self,
        fields: &[Field],
        data: &Map<String, Value>,
        locale: &str,
    ) -> BTreeMap<String, ContentView> {
        let mut views = BTreeMap::new();
        self.collect(fields, data, locale, &mut views);
        views
    }

    fn collect(
        &self,
        fields: &[Field],
        data: &Map<String, Value>,
        locale: &str,
        views: &mut BTreeMap<String, ContentView>,
    ) {
        for field in fields {
            if !field.field_type.is_renderable() {
                continue;
            }

            match field.field_type {
                FieldType::Section => {
                    if let Some(children) = &field.fields {
                        self.collect(children, data, locale, views);
                    }
                }
                FieldType::Block => {
                    let value = data.get(&field.id).unwrap_or(&Value::Null);
                    views.insert(field.id.clone(), self.resolve_block(field, value, locale));
                }
                field_type => {
                    let value = data.get(&field.id).unwrap_or(&Value::Null);
                    let view = self.pool.get(field_type).resolve(value, locale, &field.params);
                    views.insert(field.id.clone(), view);
                }
            }
        }
    }

    fn resolve_block(&self, field: &Field, value: &Value, locale: &str) -> ContentView {
        let Some(items) = value.as_array() else {
            return ContentView::null(&field.params);
        };

        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            let Some(item) = item.as_object() else {
                continue;
            };
            let type_id = item
                .get("type")
                .and_then(Value::as_str)
                .or(field.default_type.as_deref());
            let Some(block_type) = type_id.and_then(|id| field.block_type(id)) else {
                debug!("Skipping block item of unknown type {:?} in '{}'", type_id, field.id);
                continue;
            };

            let mut children = self.resolve_items(&block_type.fields, item, locale);
            children.insert(
                "type".to_string(),
                ContentView::value(Value::from(block_type.id.as_str()), Map::new()),
            );

            let mut view = Map::new();
            view.insert("type".to_string(), Value::from(block_type.id.as_str()));
            resolved.push(ContentView::new(Content::Map(children), view));
        }

        ContentView::new(Content::Views(resolved), field.params.clone())
    }
}
