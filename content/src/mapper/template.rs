use super::values;
use super::DataMapper;
use crate::Result;
use dimension::{Capability, DimensionContent};
use fields::{FieldValidator, MetadataProvider};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Locale used for metadata lookups when the data is saved without one
const METADATA_FALLBACK_LOCALE: &str = "en";

/// Maps the `template` key and the template's field values.
///
/// Only keys present in the data are written and `null` removes a value.
/// Fields flagged as not multilingual are shared across locales and land on
/// the unlocalized record.
pub struct TemplateDataMapper {
    metadata: Arc<dyn MetadataProvider>,
}

impl TemplateDataMapper {
    pub fn new(metadata: Arc<dyn MetadataProvider>) -> Self {
        Self { metadata }
    }
}

impl DataMapper for TemplateDataMapper {
    fn map(
        &self,
        unlocalized: &mut DimensionContent,
        mut localized: Option<&mut DimensionContent>,
        data: &Map<String, Value>,
    ) -> Result<()> {
        if !unlocalized.has_capability(Capability::Template) {
            return Ok(());
        }
        let Some(template_type) = unlocalized.resource().kind.template_type.clone() else {
            return Ok(());
        };

        let locale = localized
            .as_deref()
            .and_then(DimensionContent::locale)
            .unwrap_or(METADATA_FALLBACK_LOCALE)
            .to_string();
        let metadata = self.metadata.get_metadata(&template_type, &locale)?;

        // A null template keeps the current one
        let requested = values::string(data, "template")?.flatten();
        let existing = localized
            .as_deref()
            .and_then(DimensionContent::template_key)
            .or_else(|| unlocalized.template_key())
            .map(str::to_string);

        let Some(template_key) = requested.or(existing).or_else(|| metadata.default.clone()) else {
            debug!(
                "No template key for {} and no default {} template, skipping template data",
                unlocalized.resource(),
                template_type
            );
            return Ok(());
        };
        let form = metadata.require_form(&template_key, &locale)?;

        // Nothing is written unless every submitted field is valid
        let mut submitted = Vec::new();
        for field in form.flattened_fields() {
            if let Some(value) = data.get(&field.id) {
                FieldValidator::validate_field_value(field, value)?;
                submitted.push((field, value));
            }
        }

        for record in std::iter::once(&mut *unlocalized).chain(localized.as_deref_mut()) {
            if let Some(template) = record.template_mut() {
                template.template_key = Some(template_key.clone());
            }
        }

        for (field, value) in submitted {
            let target: &mut DimensionContent = match localized.as_deref_mut() {
                Some(localized) if field.multilingual => localized,
                _ => &mut *unlocalized,
            };
            let Some(template) = target.template_mut() else {
                continue;
            };

            if value.is_null() {
                template.data.remove(&field.id);
            } else {
                template.data.insert(field.id.clone(), value.clone());
            }
        }

        Ok(())
    }
}
