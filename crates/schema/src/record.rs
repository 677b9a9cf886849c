//! Partial record document

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaResult;

/// Flat JSON object holding the known values of one entity instance
///
/// Unset fields are absent. An explicit `null` is kept as-is and means the
/// value was cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a record from JSON text; the document must be an object
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    /// Value of the `_id` system field, if it is a string
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("_id").and_then(Value::as_str)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Absent, `null`, `""` or `[]`
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(None, true)]
    #[case(Some(json!(null)), true)]
    #[case(Some(json!("")), true)]
    #[case(Some(json!([])), true)]
    #[case(Some(json!(" ")), false)]
    #[case(Some(json!(0)), false)]
    #[case(Some(json!(false)), false)]
    #[case(Some(json!({})), false)]
    fn blank_values(#[case] value: Option<Value>, #[case] blank: bool) {
        assert_eq!(is_blank(value.as_ref()), blank);
    }

    #[test]
    fn keeps_explicit_null() {
        let record = Record::from_json(r#"{"_id": "r1", "Photo": null}"#).unwrap();
        assert!(record.contains("Photo"));
        assert_eq!(record.get("Photo"), Some(&Value::Null));
        assert_eq!(record.id(), Some("r1"));
    }

    #[test]
    fn rejects_non_object() {
        assert!(Record::from_json("[1, 2]").is_err());
    }
}
