//! Editable class drafts
//!
//! A [`Draft`] is the in-progress representation of an asset class. It is
//! decoded from the stored class object, completed with template defaults and
//! submitted verbatim on save. Keys the template does not declare are kept so
//! the server gets back everything it sent.

use crate::error::DecodeError;
use crate::template::ClassTemplate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Keys that belong to the editor UI rather than to the class itself.
///
/// Earlier dashboards submitted their whole component state, so stored
/// classes may still carry these.
pub const RESERVED_KEYS: &[&str] = &["step", "error", "success", "querying", "classOptionsResp"];

/// A single draft field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DraftValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<String>),
    /// Anything else found in the stored object (nested objects, mixed arrays)
    Json(Value),
}

impl DraftValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DraftValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DraftValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            DraftValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Human readable form used by text hosts
    pub fn display(&self) -> String {
        match self {
            DraftValue::Null => String::new(),
            DraftValue::Bool(b) => b.to_string(),
            DraftValue::Number(n) => n.to_string(),
            DraftValue::Text(s) => s.clone(),
            DraftValue::List(items) => items.join(", "),
            DraftValue::Json(v) => v.to_string(),
        }
    }
}

impl From<Value> for DraftValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DraftValue::Null,
            Value::Bool(b) => DraftValue::Bool(b),
            Value::Number(n) => DraftValue::Number(n),
            Value::String(s) => DraftValue::Text(s),
            Value::Array(items) if items.iter().all(Value::is_string) => DraftValue::List(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => DraftValue::Json(other),
        }
    }
}

impl From<&DraftValue> for Value {
    fn from(value: &DraftValue) -> Self {
        match value {
            DraftValue::Null => Value::Null,
            DraftValue::Bool(b) => Value::Bool(*b),
            DraftValue::Number(n) => Value::Number(n.clone()),
            DraftValue::Text(s) => Value::String(s.clone()),
            DraftValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            DraftValue::Json(v) => v.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for DraftValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(DraftValue::from)
    }
}

impl From<bool> for DraftValue {
    fn from(b: bool) -> Self {
        DraftValue::Bool(b)
    }
}

impl From<i64> for DraftValue {
    fn from(n: i64) -> Self {
        DraftValue::Number(n.into())
    }
}

impl From<&str> for DraftValue {
    fn from(s: &str) -> Self {
        DraftValue::Text(s.to_string())
    }
}

impl From<String> for DraftValue {
    fn from(s: String) -> Self {
        DraftValue::Text(s)
    }
}

impl From<Vec<String>> for DraftValue {
    fn from(items: Vec<String>) -> Self {
        DraftValue::List(items)
    }
}

/// Field name to value mapping for one class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draft(BTreeMap<String, DraftValue>);

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a stored class object. Anything but a JSON object is rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(bytes)?;
        match value {
            Value::Object(map) => Ok(Self::from_object(map)),
            other => Err(DecodeError::Shape(format!(
                "expected a class object, found {}",
                json_kind(&other)
            ))),
        }
    }

    fn from_object(map: Map<String, Value>) -> Self {
        Self(
            map.into_iter()
                .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key, DraftValue::from(value)))
                .collect(),
        )
    }

    /// Fill in template defaults for every declared key that is missing
    pub fn with_defaults(mut self, template: &ClassTemplate) -> Self {
        for field in template.fields {
            self.0
                .entry(field.key.to_string())
                .or_insert_with(|| field.widget.default_value());
        }
        self
    }

    /// JSON object sent as the body of a save
    pub fn to_payload(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), Value::from(value)))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&DraftValue> {
        self.0.get(key)
    }

    /// True when the key holds `true`
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).and_then(DraftValue::as_bool).unwrap_or(false)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: DraftValue) {
        self.0.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DraftValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, DraftValue)> for Draft {
    fn from_iter<I: IntoIterator<Item = (String, DraftValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ClassType;
    use serde_json::json;

    #[test]
    fn test_decode_maps_value_shapes() {
        let draft = Draft::decode(
            br#"{"rotate": true, "retain": 5, "volumeID": "vol-1",
                 "propagateRegions": ["us-east-1"], "tags": {"env": "prod"}, "note": null}"#,
        )
        .unwrap();

        assert_eq!(draft.get("rotate"), Some(&DraftValue::Bool(true)));
        assert_eq!(draft.get("retain"), Some(&DraftValue::from(5i64)));
        assert_eq!(draft.get("volumeID"), Some(&DraftValue::from("vol-1")));
        assert_eq!(
            draft.get("propagateRegions"),
            Some(&DraftValue::List(vec!["us-east-1".to_string()]))
        );
        assert_eq!(draft.get("tags"), Some(&DraftValue::Json(json!({"env": "prod"}))));
        assert_eq!(draft.get("note"), Some(&DraftValue::Null));
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        assert!(matches!(Draft::decode(b"[1, 2]"), Err(DecodeError::Shape(_))));
        assert!(matches!(Draft::decode(b"{not json"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_drops_reserved_ui_keys() {
        let draft = Draft::decode(br#"{"step": 2, "error": "", "querying": true, "rotate": false}"#)
            .unwrap();
        assert_eq!(draft.keys().collect::<Vec<_>>(), vec!["rotate"]);
    }

    #[test]
    fn test_defaults_never_overwrite() {
        let template = ClassType::Snapshot.template();
        let draft = Draft::decode(br#"{"rotate": true, "retain": 5}"#)
            .unwrap()
            .with_defaults(template);

        assert_eq!(draft.get("retain"), Some(&DraftValue::from(5i64)));
        assert_eq!(draft.get("propagate"), Some(&DraftValue::Bool(false)));
        assert_eq!(draft.get("propagateRegions"), Some(&DraftValue::List(vec![])));
        assert_eq!(draft.get("volumeID"), Some(&DraftValue::from("")));
        assert!(draft.is_set("rotate"));
    }

    #[test]
    fn test_payload_survives_server_echo() {
        let template = ClassType::Image.template();
        let draft = Draft::decode(br#"{"instanceID": "i-123", "propagate": true, "extra": [1, "a"]}"#)
            .unwrap()
            .with_defaults(template);

        let echoed = serde_json::to_vec(&draft.to_payload()).unwrap();
        let decoded = Draft::decode(&echoed).unwrap();

        assert_eq!(decoded, draft);
    }
}
