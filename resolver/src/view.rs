//! Resolved view values

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Id of a referenced resource; categories and media use integers, pages
/// and tags use strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Str(String),
}

impl ResourceId {
    /// Read an id from a JSON scalar
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_i64().map(ResourceId::Int),
            Value::String(s) if !s.is_empty() => Some(ResourceId::Str(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ResourceId::Int(id) => Value::from(*id),
            ResourceId::Str(id) => Value::from(id.as_str()),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Int(id) => write!(f, "{}", id),
            ResourceId::Str(id) => f.write_str(id),
        }
    }
}

/// Lazy reference to a resource, loaded in bulk after the view is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvableResource {
    pub id: ResourceId,
    pub loader_key: String,
}

impl ResolvableResource {
    pub fn new(id: ResourceId, loader_key: impl Into<String>) -> Self {
        Self {
            id,
            loader_key: loader_key.into(),
        }
    }
}

/// Content part of a view
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Null,
    Value(Value),
    Resource(ResolvableResource),
    Resources(Vec<ResolvableResource>),
    /// Ordered items, e.g. the entries of a block field
    Views(Vec<ContentView>),
    /// Named children, e.g. the fields of a template
    Map(BTreeMap<String, ContentView>),
}

/// A resolved value plus the view parameters describing it
#[derive(Debug, Clone, PartialEq)]
pub struct ContentView {
    content: Content,
    view: Map<String, Value>,
}

impl ContentView {
    pub fn new(content: Content, view: Map<String, Value>) -> Self {
        Self { content, view }
    }

    /// The view of a value that could not be resolved:
    /// `{content: null, view: {id: null, ...params}}`
    pub fn null(params: &Map<String, Value>) -> Self {
        let mut view = Map::new();
        view.insert("id".to_string(), Value::Null);
        view.extend(params.clone());
        Self::new(Content::Null, view)
    }

    pub fn value(value: Value, view: Map<String, Value>) -> Self {
        Self::new(Content::Value(value), view)
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Content {
        &mut self.content
    }

    pub fn view(&self) -> &Map<String, Value> {
        &self.view
    }

    pub fn is_null(&self) -> bool {
        matches!(self.content, Content::Null)
    }

    /// Split into plain JSON for content and view.
    ///
    /// Children of maps and lists are split the same way, so the content
    /// and the view trees share their shape. Unloaded references become null.
    pub fn into_parts(self) -> (Value, Value) {
        let view = Value::Object(self.view);
        match self.content {
            Content::Null | Content::Resource(_) => (Value::Null, view),
            Content::Resources(_) => (Value::Array(Vec::new()), view),
            Content::Value(value) => (value, view),
            Content::Views(items) => {
                let (contents, views): (Vec<_>, Vec<_>) =
                    items.into_iter().map(ContentView::into_parts).unzip();
                (Value::Array(contents), Value::Array(views))
            }
            Content::Map(children) => {
                let mut contents = Map::new();
                let mut views = Map::new();
                for (key, child) in children {
                    let (content, view) = child.into_parts();
                    contents.insert(key.clone(), content);
                    views.insert(key, view);
                }
                (Value::Object(contents), Value::Object(views))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_view_keeps_params() {
        let params = json!({"displayOption": "left"}).as_object().cloned().unwrap();

        let view = ContentView::null(&params);

        assert!(view.is_null());
        assert_eq!(
            Value::Object(view.view().clone()),
            json!({"id": null, "displayOption": "left"})
        );
    }

    #[test]
    fn test_resource_id_from_value() {
        assert_eq!(ResourceId::from_value(&json!(5)), Some(ResourceId::Int(5)));
        assert_eq!(
            ResourceId::from_value(&json!("abc")),
            Some(ResourceId::Str("abc".to_string()))
        );
        assert_eq!(ResourceId::from_value(&json!("")), None);
        assert_eq!(ResourceId::from_value(&json!(1.5)), None);
        assert_eq!(ResourceId::from_value(&json!({"id": 1})), None);
    }

    #[test]
    fn test_into_parts_mirrors_shape() {
        let mut children = BTreeMap::new();
        children.insert(
            "title".to_string(),
            ContentView::value(json!("Hello"), Map::new()),
        );
        children.insert("image".to_string(), ContentView::null(&Map::new()));
        let view = ContentView::new(Content::Map(children), Map::new());

        let (content, view) = view.into_parts();

        assert_eq!(content, json!({"title": "Hello", "image": null}));
        assert_eq!(view, json!({"title": {}, "image": {"id": null}}));
    }
}
