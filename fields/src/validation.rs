use crate::{Field, FieldType, FieldsError, Result};
use chrono::{DateTime, NaiveDate};
use serde_json::Value as JsonValue;

/// Field validator for validating submitted template values
pub struct FieldValidator;

impl FieldValidator {
    /// Validate a field value against its field definition
    pub fn validate_field_value(field: &Field, value: &JsonValue) -> Result<()> {
        // Null clears a value and is always accepted
        if value.is_null() {
            return Ok(());
        }

        match field.field_type {
            FieldType::Block => Self::validate_block(field, value),
            FieldType::Section => Err(FieldsError::InvalidType(format!(
                "Field '{}' is a section and cannot hold a value",
                field.id
            ))),
            field_type if field_type.is_multi_value() => Self::validate_list(field, value),
            _ => {
                if value.is_array() {
                    return Err(FieldsError::CardinalityViolation(format!(
                        "Field '{}' expects a single value, not an array",
                        field.id
                    )));
                }
                Self::validate_single_value(field, value)
            }
        }
    }

    /// Validate a single value based on field type
    fn validate_single_value(field: &Field, value: &JsonValue) -> Result<()> {
        match field.field_type {
            t if t.is_text() => Self::validate_text(field, value),
            FieldType::Number => Self::validate_number(field, value),
            FieldType::Checkbox => Self::validate_boolean(field, value),
            FieldType::Date => Self::validate_date(field, value),
            FieldType::SingleSelect => Self::validate_scalar(field, value),
            FieldType::SingleCategorySelection | FieldType::SinglePageSelection => {
                Self::validate_scalar(field, value)
            }
            FieldType::SingleMediaSelection => Self::validate_media(field, value),
            _ => Ok(()),
        }
    }

    fn validate_text(field: &Field, value: &JsonValue) -> Result<()> {
        if !value.is_string() {
            return Err(FieldsError::TypeConversion(format!(
                "Field '{}' expects a string value",
                field.id
            )));
        }
        Ok(())
    }

    fn validate_number(field: &Field, value: &JsonValue) -> Result<()> {
        if !value.is_number() {
            return Err(FieldsError::TypeConversion(format!(
                "Field '{}' expects a number",
                field.id
            )));
        }
        Ok(())
    }

    fn validate_boolean(field: &Field, value: &JsonValue) -> Result<()> {
        if !value.is_boolean() {
            return Err(FieldsError::TypeConversion(format!(
                "Field '{}' expects a boolean value",
                field.id
            )));
        }
        Ok(())
    }

    fn validate_date(field: &Field, value: &JsonValue) -> Result<()> {
        let text = value.as_str().ok_or_else(|| {
            FieldsError::TypeConversion(format!("Field '{}' expects a date string", field.id))
        })?;

        let parses = DateTime::parse_from_rfc3339(text).is_ok()
            || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok();
        if !parses {
            return Err(FieldsError::Validation(format!(
                "Field '{}' contains an invalid date: '{}'",
                field.id, text
            )));
        }
        Ok(())
    }

    fn validate_scalar(field: &Field, value: &JsonValue) -> Result<()> {
        if !(value.is_string() || value.is_number()) {
            return Err(FieldsError::TypeConversion(format!(
                "Field '{}' expects a string or numeric identifier",
                field.id
            )));
        }
        Ok(())
    }

    /// Single media values are stored as `{"id": .., "displayOption": ..}`
    fn validate_media(field: &Field, value: &JsonValue) -> Result<()> {
        match value.as_object() {
            Some(object) if object.contains_key("id") => Ok(()),
            _ => Err(FieldsError::TypeConversion(format!(
                "Field '{}' expects an object with an 'id'",
                field.id
            ))),
        }
    }

    fn validate_list(field: &Field, value: &JsonValue) -> Result<()> {
        // Media selections wrap their ids: {"ids": [..], "displayOption": ..}
        let items = if field.field_type == FieldType::MediaSelection {
            value.get("ids").and_then(JsonValue::as_array)
        } else {
            value.as_array()
        };

        let items = items.ok_or_else(|| {
            FieldsError::CardinalityViolation(format!(
                "Field '{}' expects a list of values",
                field.id
            ))
        })?;

        for item in items {
            if !(item.is_string() || item.is_number()) {
                return Err(FieldsError::TypeConversion(format!(
                    "Field '{}' contains a value that is not an identifier: {}",
                    field.id, item
                )));
            }
        }
        Ok(())
    }

    fn validate_block(field: &Field, value: &JsonValue) -> Result<()> {
        let items = value.as_array().ok_or_else(|| {
            FieldsError::CardinalityViolation(format!(
                "Field '{}' expects a list of blocks",
                field.id
            ))
        })?;

        for item in items {
            let object = item.as_object().ok_or_else(|| {
                FieldsError::TypeConversion(format!(
                    "Field '{}' contains a non-object block",
                    field.id
                ))
            })?;

            let type_id = object
                .get("type")
                .and_then(JsonValue::as_str)
                .or(field.default_type.as_deref())
                .ok_or_else(|| {
                    FieldsError::Validation(format!(
                        "Field '{}' contains a block without a type",
                        field.id
                    ))
                })?;

            let block_type = field.block_type(type_id).ok_or_else(|| {
                FieldsError::Validation(format!(
                    "Field '{}' contains a block of unknown type '{}'",
                    field.id, type_id
                ))
            })?;

            for nested in &block_type.fields {
                if let Some(nested_value) = object.get(&nested.id) {
                    Self::validate_field_value(nested, nested_value)?;
                }
            }
        }
        Ok(())
    }
}
