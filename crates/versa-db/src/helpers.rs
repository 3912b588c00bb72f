//! JSON conversion helpers for list-valued attributes stored as text.

use rusqlite::types::Value;
use serde::{de::DeserializeOwned, Serialize};

/// Serializes a value to JSON text for storage in a text column.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Deserializes a JSON attribute value, treating NULL, empty and `"null"`
/// text as absent.
pub fn from_json_value<T: DeserializeOwned>(value: Option<&Value>) -> Option<T> {
    match value {
        Some(Value::Text(s)) if !s.is_empty() && s != "null" => serde_json::from_str(s).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let tags = vec!["a".to_string(), "b".to_string()];
        let stored = Value::Text(to_json(&tags));
        let loaded: Option<Vec<String>> = from_json_value(Some(&stored));
        assert_eq!(loaded, Some(tags));
    }

    #[test]
    fn absent_and_null_read_as_none() {
        assert_eq!(from_json_value::<Vec<String>>(None), None);
        assert_eq!(from_json_value::<Vec<String>>(Some(&Value::Null)), None);
        assert_eq!(
            from_json_value::<Vec<String>>(Some(&Value::Text("null".into()))),
            None
        );
        assert_eq!(
            from_json_value::<Vec<String>>(Some(&Value::Text(String::new()))),
            None
        );
    }
}
