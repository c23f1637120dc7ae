//! Typed access to flat submitted data.
//!
//! Every accessor returns `Ok(None)` when the key is absent, `Ok(Some(None))`
//! when it is explicitly `null`, and an error when the value has the wrong
//! shape.

use crate::error::ContentError;
use crate::Result;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub(crate) type Data = Map<String, Value>;

pub(crate) fn string(data: &Data, key: &str) -> Result<Option<Option<String>>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(_) => Err(ContentError::invalid(key, "expected a string")),
    }
}

pub(crate) fn boolean(data: &Data, key: &str) -> Result<Option<bool>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(false)),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ContentError::invalid(key, "expected a boolean")),
    }
}

pub(crate) fn datetime(data: &Data, key: &str) -> Result<Option<Option<DateTime<Utc>>>> {
    match string(data, key)? {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(text)) => DateTime::parse_from_rfc3339(&text)
            .map(|d| Some(Some(d.with_timezone(&Utc))))
            .map_err(|e| ContentError::invalid(key, format!("expected an RFC 3339 date: {}", e))),
    }
}

pub(crate) fn id_list(data: &Data, key: &str) -> Result<Option<Vec<i64>>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(Vec::new())),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_i64()
                    .ok_or_else(|| ContentError::invalid(key, "expected a list of integer ids"))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(_) => Err(ContentError::invalid(key, "expected a list of integer ids")),
    }
}

pub(crate) fn string_list(data: &Data, key: &str) -> Result<Option<Vec<String>>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(Vec::new())),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ContentError::invalid(key, "expected a list of strings"))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(_) => Err(ContentError::invalid(key, "expected a list of strings")),
    }
}

/// Media references are submitted as `{"id": 42}`
pub(crate) fn media_id(data: &Data, key: &str) -> Result<Option<Option<i64>>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::Object(object)) => match object.get("id") {
            None | Some(Value::Null) => Ok(Some(None)),
            Some(id) => id
                .as_i64()
                .map(|id| Some(Some(id)))
                .ok_or_else(|| ContentError::invalid(key, "expected an integer media id")),
        },
        Some(_) => Err(ContentError::invalid(key, "expected an object with an 'id'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Data {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_absent_null_and_present() {
        let data = data(json!({"title": "Hello", "more": null, "count": 3}));

        assert_eq!(string(&data, "missing").unwrap(), None);
        assert_eq!(string(&data, "more").unwrap(), Some(None));
        assert_eq!(string(&data, "title").unwrap(), Some(Some("Hello".to_string())));
        assert!(string(&data, "count").is_err());
    }

    #[test]
    fn test_lists_and_media() {
        let data = data(json!({
            "categories": [1, 2],
            "tags": ["rust"],
            "image": {"id": 7},
            "broken": [1, "two"]
        }));

        assert_eq!(id_list(&data, "categories").unwrap(), Some(vec![1, 2]));
        assert_eq!(string_list(&data, "tags").unwrap(), Some(vec!["rust".to_string()]));
        assert_eq!(media_id(&data, "image").unwrap(), Some(Some(7)));
        assert!(id_list(&data, "broken").is_err());
        assert!(media_id(&data, "tags").is_err());
    }

    #[test]
    fn test_datetime() {
        let data = data(json!({"authored": "2024-05-01T08:30:00+02:00", "bad": "May 1st"}));

        let authored = datetime(&data, "authored").unwrap().unwrap().unwrap();
        assert_eq!(authored.to_rfc3339(), "2024-05-01T06:30:00+00:00");
        assert!(datetime(&data, "bad").is_err());
    }
}
