//! Dynamic record values shared by every entity kind.
//!
//! The remote endpoint returns loosely typed rows: the same id may arrive as
//! `12` on one resource and `"12"` on another. Records therefore stay as JSON
//! maps and every read goes through [`FieldValue`], which never fails.

use crate::entity::IdField;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A primitive display value read out of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Empty,
}

impl FieldValue {
    /// Convert a JSON value. Null, arrays and objects have no display form.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Number(n) => n
                .as_i64()
                .map(FieldValue::Integer)
                .or_else(|| n.as_f64().map(FieldValue::Float))
                .unwrap_or(FieldValue::Empty),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => FieldValue::Empty,
        }
    }

    /// True for `Empty` and for whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Integer(_) | FieldValue::Float(_) => false,
        }
    }

    /// Numeric reading, parsing text when needed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) if f.is_finite() => Some(*f),
            FieldValue::Float(_) => None,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            FieldValue::Empty => None,
        }
    }

    /// Trimmed string form used for identity and equality checks.
    pub fn normalized(&self) -> String {
        self.to_string().trim().to_string()
    }

    /// Case-insensitive substring test against an already lowercased needle.
    pub fn contains_folded(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }
        match self {
            FieldValue::Empty => false,
            other => other.to_string().to_lowercase().contains(needle_lower),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Empty => Ok(()),
        }
    }
}

/// One row of domain data: an open field-name to JSON value mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Builder-style setter, handy for fixtures and payloads.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> FieldValue {
        self.0
            .get(field)
            .map(FieldValue::from_json)
            .unwrap_or(FieldValue::Empty)
    }

    pub fn text(&self, field: &str) -> String {
        self.get(field).to_string()
    }

    pub fn raw(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Identity under the given id field, if the field is present and non-empty.
    pub fn id(&self, id_field: IdField) -> Option<RecordId> {
        RecordId::from_value(id_field, &self.get(id_field.name()))
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

/// Explicit identity of a record: the id field name plus its normalized value.
///
/// `12` and `"12"` resolve to the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    field: IdField,
    value: String,
}

impl RecordId {
    pub fn new(field: IdField, value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(Self { field, value })
        }
    }

    pub fn from_integer(field: IdField, value: i64) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }

    pub fn from_value(field: IdField, value: &FieldValue) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        Self::new(field, value.normalized())
    }

    pub fn field(&self) -> IdField {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// JSON form for payloads: integral ids go out as numbers.
    pub fn to_json(&self) -> Value {
        match self.value.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::from(self.value.clone()),
        }
    }

    /// True when `record` carries this identity under the same id field.
    pub fn matches(&self, record: &Record) -> bool {
        record.get(self.field.name()).normalized() == self.value
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field.name(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_from_json_variants() {
        assert_eq!(FieldValue::from_json(&json!("abc")), FieldValue::Text("abc".into()));
        assert_eq!(FieldValue::from_json(&json!(7)), FieldValue::Integer(7));
        assert_eq!(FieldValue::from_json(&json!(2.5)), FieldValue::Float(2.5));
        assert_eq!(FieldValue::from_json(&json!(true)), FieldValue::Text("true".into()));
        assert_eq!(FieldValue::from_json(&json!(null)), FieldValue::Empty);
        assert_eq!(FieldValue::from_json(&json!([1, 2])), FieldValue::Empty);
    }

    #[test]
    fn test_absent_field_is_empty_and_displays_blank() {
        let record = Record::new().with("name", "Algebra");
        assert_eq!(record.get("missing"), FieldValue::Empty);
        assert_eq!(record.text("missing"), "");
    }

    #[test]
    fn test_contains_folded_is_case_insensitive() {
        let value = FieldValue::Text("Biology".into());
        assert!(value.contains_folded("bio"));
        assert!(!value.contains_folded("chem"));
        assert!(!FieldValue::Empty.contains_folded("x"));
        assert!(FieldValue::Integer(1204).contains_folded("20"));
    }

    #[test]
    fn test_numeric_and_text_ids_are_equal() {
        let field = IdField::new("cid");
        let a = Record::new().with("cid", 12).id(field);
        let b = Record::new().with("cid", " 12 ").id(field);
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_id_does_not_resolve() {
        let field = IdField::new("rid");
        assert!(Record::new().with("rid", "").id(field).is_none());
        assert!(Record::new().id(field).is_none());
    }

    #[test]
    fn test_record_id_json_keeps_numbers_numeric() {
        let id = RecordId::new(IdField::new("did"), "4").unwrap();
        assert_eq!(id.to_json(), json!(4));
        let id = RecordId::new(IdField::new("did"), "D-4").unwrap();
        assert_eq!(id.to_json(), json!("D-4"));
    }

    #[test]
    fn test_record_round_trips_transparently() {
        let record: Record = serde_json::from_value(json!({"sid": 1, "name": "A"})).unwrap();
        assert_eq!(record.get("sid"), FieldValue::Integer(1));
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"sid": 1, "name": "A"}));
    }
}
