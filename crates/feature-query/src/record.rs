//! Normalized feature records.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::geometry::FeatureGeometry;

/// Output field wildcard: every attribute the service returns.
pub const ALL_FIELDS: &str = "*";

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Convert a JSON attribute. Arrays and objects are not scalars and are
    /// kept as their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Null),
            },
            Value::String(s) => FieldValue::Text(s.clone()),
            other => FieldValue::Text(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// One feature: requested fields in request order, plus geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub attributes: Vec<(String, FieldValue)>,
    pub geometry: Option<FeatureGeometry>,
}

impl FeatureRecord {
    /// Pick `out_fields` from a feature's attribute map.
    ///
    /// Names match exactly first, then case-insensitively. A field the
    /// service did not return is `Null`. `*` takes every attribute.
    pub fn from_attributes<S: AsRef<str>>(
        attributes: &Map<String, Value>,
        out_fields: &[S],
        geometry: Option<FeatureGeometry>,
    ) -> Self {
        let wildcard = out_fields.is_empty() || out_fields.iter().any(|f| f.as_ref() == ALL_FIELDS);

        let attributes = if wildcard {
            attributes
                .iter()
                .map(|(name, value)| (name.clone(), FieldValue::from_json(value)))
                .collect()
        } else {
            out_fields
                .iter()
                .map(|field| {
                    let field = field.as_ref();
                    let value = lookup(attributes, field)
                        .map(FieldValue::from_json)
                        .unwrap_or(FieldValue::Null);
                    (field.to_string(), value)
                })
                .collect()
        };

        Self {
            attributes,
            geometry,
        }
    }

    /// Attribute value by name (case-insensitive fallback).
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.attributes
            .iter()
            .find(|(name, _)| name == field)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(field))
            })
            .map(|(_, value)| value)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(name, _)| name.as_str())
    }
}

fn lookup<'a>(attributes: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    attributes.get(field).or_else(|| {
        attributes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, value)| value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_requested_order_and_missing_fields() {
        let a = attrs(json!({"town": "ARLINGTON", "taz": 1025}));
        let record = FeatureRecord::from_attributes(&a, &["taz", "town", "total_pop_2010"], None);

        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["taz", "town", "total_pop_2010"]);
        assert_eq!(record.get("taz"), Some(&FieldValue::Integer(1025)));
        assert_eq!(record.get("total_pop_2010"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let a = attrs(json!({"TAZ": 1025, "TOWN": "ARLINGTON"}));
        let record = FeatureRecord::from_attributes(&a, &["taz", "town"], None);
        assert_eq!(record.get("town").and_then(FieldValue::as_str), Some("ARLINGTON"));
        assert_eq!(record.get("TAZ"), Some(&FieldValue::Integer(1025)));
    }

    #[test]
    fn test_wildcard_takes_everything() {
        let a = attrs(json!({"a": 1, "b": 2.5, "c": true}));
        let record = FeatureRecord::from_attributes(&a, &["*"], None);
        assert_eq!(record.attributes.len(), 3);
        assert_eq!(record.get("b"), Some(&FieldValue::Number(2.5)));
        assert_eq!(record.get("c"), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::Integer(2547).to_string(), "2547");
        assert_eq!(FieldValue::Null.to_string(), "null");
        assert_eq!(FieldValue::Text("x".into()).to_string(), "x");
    }

    #[test]
    fn test_non_scalar_kept_as_text() {
        assert_eq!(
            FieldValue::from_json(&json!([1, 2])),
            FieldValue::Text("[1,2]".to_string())
        );
    }
}
