//! Typed attribute values for nodes, edges and the graph itself
//!
//! GEXF declares a type per attribute column; values are parsed once into a
//! closed set of variants and never re-interpreted afterwards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single attribute value.
///
/// Serialized untagged, so JSON documents carry plain scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view: floats as-is, integers widened
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn attribute_type(&self) -> AttributeType {
        match self {
            AttributeValue::Boolean(_) => AttributeType::Boolean,
            AttributeValue::Integer(_) => AttributeType::Integer,
            AttributeValue::Float(_) => AttributeType::Float,
            AttributeValue::String(_) => AttributeType::String,
        }
    }

    /// Whether this value matches a filter string given on the command line.
    ///
    /// Numbers compare numerically (`"2"` matches `2.0`), booleans ignore
    /// case, strings compare exactly.
    pub fn matches_str(&self, expected: &str) -> bool {
        match self {
            AttributeValue::String(s) => s == expected,
            AttributeValue::Boolean(b) => {
                let rendered = if *b { "true" } else { "false" };
                rendered.eq_ignore_ascii_case(expected.trim())
            }
            AttributeValue::Integer(i) => match expected.trim().parse::<f64>() {
                Ok(parsed) => parsed == *i as f64,
                Err(_) => false,
            },
            AttributeValue::Float(f) => match expected.trim().parse::<f64>() {
                Ok(parsed) => parsed == *f,
                Err(_) => false,
            },
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{}", s),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            // Debug keeps a trailing ".0" so floats stay floats on re-import
            AttributeValue::Float(fl) => write!(f, "{:?}", fl),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

/// Declared type of an attribute column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Integer,
    Float,
    Boolean,
    String,
}

impl AttributeType {
    /// Map a GEXF type name. Unknown types (`liststring`, `anyURI`, `date`,
    /// ...) are kept as strings.
    pub fn from_gexf(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "integer" | "long" | "short" | "byte" | "int" => AttributeType::Integer,
            "float" | "double" => AttributeType::Float,
            "boolean" | "bool" => AttributeType::Boolean,
            _ => AttributeType::String,
        }
    }

    /// Type name written to GEXF and GraphML documents
    pub fn xml_name(self) -> &'static str {
        match self {
            AttributeType::Integer => "long",
            AttributeType::Float => "double",
            AttributeType::Boolean => "boolean",
            AttributeType::String => "string",
        }
    }

    /// Parse a raw document value as this type. `None` if it does not fit.
    pub fn parse_value(self, raw: &str) -> Option<AttributeValue> {
        match self {
            AttributeType::Integer => raw.trim().parse::<i64>().ok().map(AttributeValue::Integer),
            AttributeType::Float => raw.trim().parse::<f64>().ok().map(AttributeValue::Float),
            AttributeType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(AttributeValue::Boolean(true)),
                "false" | "0" => Some(AttributeValue::Boolean(false)),
                _ => None,
            },
            AttributeType::String => Some(AttributeValue::String(raw.to_string())),
        }
    }

    /// Narrowest type able to hold values of both `self` and `other`.
    pub fn widen(self, other: AttributeType) -> AttributeType {
        match (self, other) {
            (a, b) if a == b => a,
            (AttributeType::Integer, AttributeType::Float) | (AttributeType::Float, AttributeType::Integer) => {
                AttributeType::Float
            }
            _ => AttributeType::String,
        }
    }
}

/// Attribute name to value, in first-seen order
pub type AttributeMap = IndexMap<String, AttributeValue>;

/// Column types across a set of attribute maps, in first-seen key order.
pub fn infer_types<'a>(maps: impl IntoIterator<Item = &'a AttributeMap>) -> IndexMap<String, AttributeType> {
    let mut types: IndexMap<String, AttributeType> = IndexMap::new();
    for map in maps {
        for (key, value) in map {
            let seen = value.attribute_type();
            types
                .entry(key.clone())
                .and_modify(|current| *current = current.widen(seen))
                .or_insert(seen);
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_declared_type() {
        assert_eq!(AttributeType::from_gexf("long").parse_value("42"), Some(AttributeValue::Integer(42)));
        assert_eq!(AttributeType::from_gexf("double").parse_value("2.5"), Some(AttributeValue::Float(2.5)));
        assert_eq!(AttributeType::from_gexf("boolean").parse_value("TRUE"), Some(AttributeValue::Boolean(true)));
        assert_eq!(AttributeType::from_gexf("integer").parse_value("forty"), None);
        // unknown types surface as strings
        assert_eq!(
            AttributeType::from_gexf("liststring").parse_value("a|b"),
            Some(AttributeValue::String("a|b".into()))
        );
    }

    #[test]
    fn test_display_keeps_float_marker() {
        assert_eq!(AttributeValue::Float(2.0).to_string(), "2.0");
        assert_eq!(AttributeValue::Integer(2).to_string(), "2");
        assert_eq!(AttributeValue::from("db").to_string(), "db");
    }

    #[test]
    fn test_matches_str() {
        assert!(AttributeValue::Float(2.0).matches_str("2"));
        assert!(AttributeValue::Integer(3).matches_str("3.0"));
        assert!(AttributeValue::Boolean(true).matches_str("True"));
        assert!(AttributeValue::from("server").matches_str("server"));
        assert!(!AttributeValue::from("server").matches_str("Server"));
        assert!(!AttributeValue::Integer(3).matches_str("three"));
    }

    #[test]
    fn test_json_scalars_roundtrip_types() {
        let json = r#"{"a": 1, "b": 1.5, "c": true, "d": "x", "e": 2.0}"#;
        let map: AttributeMap = serde_json::from_str(json).unwrap();
        assert_eq!(map["a"], AttributeValue::Integer(1));
        assert_eq!(map["b"], AttributeValue::Float(1.5));
        assert_eq!(map["c"], AttributeValue::Boolean(true));
        assert_eq!(map["d"], AttributeValue::String("x".into()));
        assert_eq!(map["e"], AttributeValue::Float(2.0));
    }

    #[test]
    fn test_infer_types_widens() {
        let mut first = AttributeMap::new();
        first.insert("n".into(), AttributeValue::Integer(1));
        first.insert("s".into(), AttributeValue::from("x"));
        let mut second = AttributeMap::new();
        second.insert("n".into(), AttributeValue::Float(0.5));
        second.insert("s".into(), AttributeValue::Integer(3));

        let types = infer_types([&first, &second]);
        assert_eq!(types["n"], AttributeType::Float);
        assert_eq!(types["s"], AttributeType::String);
    }
}
