use crate::error::{FieldsError, Result};
use crate::field_types::{Field, FieldType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Form metadata for a single template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormMetadata {
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl FormMetadata {
    pub fn new(key: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            key: key.into(),
            title: None,
            fields,
        }
    }

    /// Get all top-level fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get a field by id, looking through sections
    pub fn get_field(&self, id: &str) -> Option<&Field> {
        self.flattened_fields().into_iter().find(|f| f.id == id)
    }

    /// Fields as they appear in stored template data.
    ///
    /// Sections only group fields in the form; their children are stored at
    /// the top level next to the section's siblings.
    pub fn flattened_fields(&self) -> Vec<&Field> {
        let mut flattened = Vec::new();
        collect_fields(&self.fields, &mut flattened);
        flattened
    }

    /// Validate every field definition of this form
    pub fn validate(&self) -> Result<()> {
        for field in &self.fields {
            field.validate().map_err(FieldsError::Validation)?;
        }
        Ok(())
    }
}

fn collect_fields<'a>(fields: &'a [Field], out: &mut Vec<&'a Field>) {
    for field in fields {
        if field.field_type == FieldType::Section {
            if let Some(children) = &field.fields {
                collect_fields(children, out);
            }
        } else {
            out.push(field);
        }
    }
}

/// All templates of one template type (e.g. every page template)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypedFormMetadata {
    #[serde(rename = "type")]
    pub template_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub forms: BTreeMap<String, FormMetadata>,
}

impl TypedFormMetadata {
    pub fn new(template_type: impl Into<String>) -> Self {
        Self {
            template_type: template_type.into(),
            default: None,
            forms: BTreeMap::new(),
        }
    }

    /// Add a template form, keyed by its template key
    pub fn with_form(mut self, mut form: FormMetadata, key: impl Into<String>) -> Self {
        let key = key.into();
        form.key = key.clone();
        self.forms.insert(key, form);
        self
    }

    /// Set the template used when content does not name one
    pub fn with_default(mut self, key: impl Into<String>) -> Self {
        self.default = Some(key.into());
        self
    }

    pub fn form(&self, key: &str) -> Option<&FormMetadata> {
        self.forms.get(key)
    }

    pub fn default_form(&self) -> Option<&FormMetadata> {
        self.default.as_deref().and_then(|key| self.form(key))
    }

    /// Look up a template form or fail with a metadata error naming it
    pub fn require_form(&self, key: &str, locale: &str) -> Result<&FormMetadata> {
        self.form(key).ok_or_else(|| FieldsError::MetadataNotFound {
            form_key: self.template_type.clone(),
            template_key: key.to_string(),
            locale: locale.to_string(),
        })
    }
}

/// Source of template metadata
pub trait MetadataProvider: Send + Sync {
    /// Get all templates registered for a form key (template type)
    fn get_metadata(&self, form_key: &str, locale: &str) -> Result<Arc<TypedFormMetadata>>;
}

/// In-memory metadata registry, usually filled from `*.form.yaml` files
#[derive(Debug, Default)]
pub struct FormMetadataRegistry {
    forms: HashMap<String, Arc<TypedFormMetadata>>,
}

impl FormMetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the templates of one template type, replacing earlier ones
    pub fn register(&mut self, metadata: TypedFormMetadata) -> Result<()> {
        for form in metadata.forms.values() {
            form.validate()?;
        }
        if let Some(default) = &metadata.default {
            if !metadata.forms.contains_key(default) {
                return Err(FieldsError::Validation(format!(
                    "Default template '{}' of '{}' is not defined",
                    default, metadata.template_type
                )));
            }
        }

        debug!(
            "Registered {} templates for '{}'",
            metadata.forms.len(),
            metadata.template_type
        );
        self.forms
            .insert(metadata.template_type.clone(), Arc::new(metadata));
        Ok(())
    }

    /// Parse one typed form from YAML
    pub fn parse_yaml(content: &str) -> Result<TypedFormMetadata> {
        let mut metadata: TypedFormMetadata = serde_yaml::from_str(content)?;
        for (key, form) in metadata.forms.iter_mut() {
            if form.key.is_empty() {
                form.key = key.clone();
            }
        }
        Ok(metadata)
    }

    /// Load a single typed form from a YAML file
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        debug!("Loading form metadata from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .map_err(|e| FieldsError::SchemaParsing(format!("Failed to read file: {}", e)))?;
        let metadata = Self::parse_yaml(&content)?;

        info!(
            "Loaded form '{}' from {:?}",
            metadata.template_type, path
        );
        self.register(metadata)
    }

    /// Load every `*.form.yaml` / `*.form.yml` file of a directory
    pub fn load_from_directory(dir: &Path) -> Result<Self> {
        info!("Loading form metadata from directory: {:?}", dir);

        if !dir.exists() {
            return Err(FieldsError::SchemaParsing(format!(
                "Form directory does not exist: {:?}",
                dir
            )));
        }

        let mut registry = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            let is_yaml = path
                .extension()
                .map(|ext| ext == "yaml" || ext == "yml")
                .unwrap_or(false);
            let is_form = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().ends_with(".form"))
                .unwrap_or(false);

            if is_yaml && is_form {
                if let Err(e) = registry.load_from_file(&path) {
                    // Log error but continue loading other forms
                    error!("Failed to load form metadata from {:?}: {}", path, e);
                }
            }
        }

        info!("Loaded {} form types", registry.forms.len());
        Ok(registry)
    }
}

impl MetadataProvider for FormMetadataRegistry {
    fn get_metadata(&self, form_key: &str, locale: &str) -> Result<Arc<TypedFormMetadata>> {
        self.forms
            .get(form_key)
            .cloned()
            .ok_or_else(|| FieldsError::FormNotFound {
                form_key: form_key.to_string(),
                locale: locale.to_string(),
            })
    }
}
