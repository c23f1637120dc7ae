use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Property types understood by template forms
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    TextLine,
    TextArea,
    TextEditor,
    Number,
    Checkbox,
    Date,
    Url,
    Email,
    SingleSelect,
    Select,
    CategorySelection,
    SingleCategorySelection,
    MediaSelection,
    SingleMediaSelection,
    PageSelection,
    SinglePageSelection,
    TagSelection,
    Block,
    Section,
    SearchResult,
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// Whether values of this type end up in a rendered view.
    /// Preview widgets such as `search_result` only exist in the admin form.
    pub fn is_renderable(&self) -> bool {
        !matches!(self, FieldType::SearchResult)
    }

    /// Check if this field type stores plain text
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FieldType::TextLine
                | FieldType::TextArea
                | FieldType::TextEditor
                | FieldType::Url
                | FieldType::Email
        )
    }

    /// Check if this field type holds a list of values
    pub fn is_multi_value(&self) -> bool {
        matches!(
            self,
            FieldType::Select
                | FieldType::CategorySelection
                | FieldType::MediaSelection
                | FieldType::PageSelection
                | FieldType::TagSelection
                | FieldType::Block
        )
    }

    /// Loader key used to resolve references held by this field type
    pub fn resource_loader_key(&self) -> Option<&'static str> {
        match self {
            FieldType::CategorySelection | FieldType::SingleCategorySelection => Some("category"),
            FieldType::MediaSelection | FieldType::SingleMediaSelection => Some("media"),
            FieldType::PageSelection | FieldType::SinglePageSelection => Some("page"),
            FieldType::TagSelection => Some("tag"),
            _ => None,
        }
    }
}

/// A block type: one of the shapes a `block` field item may take
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockType {
    pub id: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// Field definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_multilingual")]
    pub multilingual: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<BlockType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_type: Option<String>,
}

pub fn default_multilingual() -> bool {
    true
}

impl Field {
    /// Create a new field with minimal configuration
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            required: false,
            multilingual: true,
            params: Map::new(),
            fields: None,
            types: None,
            default_type: None,
        }
    }

    /// Set the field as required
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Mark the field as shared between all locales
    pub fn multilingual(mut self, multilingual: bool) -> Self {
        self.multilingual = multilingual;
        self
    }

    /// Add a resolver parameter
    pub fn with_param(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Set nested fields for section fields
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Set the block types for block fields
    pub fn with_types(mut self, types: Vec<BlockType>) -> Self {
        if self.default_type.is_none() {
            self.default_type = types.first().map(|t| t.id.clone());
        }
        self.types = Some(types);
        self
    }

    /// Look up a block type by id
    pub fn block_type(&self, id: &str) -> Option<&BlockType> {
        self.types.as_ref()?.iter().find(|t| t.id == id)
    }

    /// Validate the field configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("Field ID cannot be empty".to_string());
        }

        if self.field_type == FieldType::Section && self.fields.is_none() {
            return Err(format!(
                "Field '{}' is a section but has no nested fields",
                self.id
            ));
        }

        if self.field_type == FieldType::Block {
            let types = match &self.types {
                Some(types) if !types.is_empty() => types,
                _ => {
                    return Err(format!(
                        "Field '{}' is a block but defines no types",
                        self.id
                    ))
                }
            };

            if let Some(default_type) = &self.default_type {
                if !types.iter().any(|t| &t.id == default_type) {
                    return Err(format!(
                        "Field '{}' has unknown default type '{}'",
                        self.id, default_type
                    ));
                }
            }

            for block_type in types {
                for nested in &block_type.fields {
                    nested.validate()?;
                }
            }
        }

        if let Some(nested_fields) = &self.fields {
            for nested_field in nested_fields {
                nested_field.validate()?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_properties() {
        assert!(!FieldType::SearchResult.is_renderable());
        assert!(FieldType::TextLine.is_renderable());

        assert_eq!(FieldType::MediaSelection.resource_loader_key(), Some("media"));
        assert_eq!(FieldType::SinglePageSelection.resource_loader_key(), Some("page"));
        assert_eq!(FieldType::TextLine.resource_loader_key(), None);
    }

    #[test]
    fn test_unknown_type_deserializes() {
        let field: Field = serde_json::from_value(serde_json::json!({
            "id": "color",
            "type": "color_picker"
        }))
        .unwrap();

        assert_eq!(field.field_type, FieldType::Unknown);
        assert!(field.multilingual);
    }

    #[test]
    fn test_field_builder() {
        let field = Field::new("title", FieldType::TextLine, "Title")
            .required(true)
            .multilingual(false)
            .with_param("headline", serde_json::json!(true));

        assert_eq!(field.id, "title");
        assert!(field.required);
        assert!(!field.multilingual);
        assert_eq!(field.params.get("headline"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn test_field_validation() {
        assert!(Field::new("title", FieldType::TextLine, "Title").validate().is_ok());
        assert!(Field::new("", FieldType::TextLine, "Title").validate().is_err());

        let empty_section = Field::new("settings", FieldType::Section, "Settings");
        assert!(empty_section.validate().is_err());

        let empty_block = Field::new("blocks", FieldType::Block, "Blocks");
        assert!(empty_block.validate().is_err());

        let block = Field::new("blocks", FieldType::Block, "Blocks").with_types(vec![BlockType {
            id: "text".to_string(),
            fields: vec![Field::new("text", FieldType::TextEditor, "Text")],
        }]);
        assert!(block.validate().is_ok());
        assert_eq!(block.default_type.as_deref(), Some("text"));
    }
}
