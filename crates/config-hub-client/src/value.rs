//! Typed decoding of property values.
//!
//! The server ships every property value as a string alongside an optional
//! type tag. Decoding happens at read time through [`ValueType::from_tag`]
//! and [`decode`], both of which are pure so they can be exercised without
//! a server.

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

use serde_json::Value;
use thiserror::Error;

/// Decoding rule selected by a property's `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// `Boolean`: only the literal `"true"` is true.
    Boolean,
    /// `Integer` and `Long`: base-10 signed integer.
    Integer,
    /// `Float` and `Double`: floating point.
    Float,
    /// `JSON`: an embedded JSON document.
    Json,
    /// No tag, or a tag the client does not recognise.
    String,
}

impl ValueType {
    /// Maps a wire tag to its decoding rule. Tags are case-sensitive.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("Boolean") => ValueType::Boolean,
            Some("Integer") | Some("Long") => ValueType::Integer,
            Some("Float") | Some("Double") => ValueType::Float,
            Some("JSON") => ValueType::Json,
            // Unknown tags are passed through untouched rather than rejected.
            _ => ValueType::String,
        }
    }
}

/// A property value after type-tag decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Json(Value),
    String(String),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(value) => Some(*value),
            ConfigValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ConfigValue::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(value) => write!(f, "{value}"),
            ConfigValue::Integer(value) => write!(f, "{value}"),
            ConfigValue::Float(value) => write!(f, "{value}"),
            ConfigValue::Json(value) => write!(f, "{value}"),
            ConfigValue::String(value) => f.write_str(value),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        ConfigValue::Json(value)
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

/// Errors raised while decoding a value according to its type tag.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// An `Integer`/`Long` value was not a base-10 integer.
    #[error("invalid integer value {value:?}: {source}")]
    Integer {
        value: String,
        #[source]
        source: ParseIntError,
    },
    /// A `Float`/`Double` value was not a floating point number.
    #[error("invalid float value {value:?}: {source}")]
    Float {
        value: String,
        #[source]
        source: ParseFloatError,
    },
    /// A `JSON` value, or the pulled document itself, was not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes a raw property value according to its decoding rule.
pub fn decode(raw: &str, value_type: ValueType) -> Result<ConfigValue, DecodeError> {
    match value_type {
        ValueType::Boolean => Ok(ConfigValue::Bool(raw == "true")),
        ValueType::Integer => raw
            .parse::<i64>()
            .map(ConfigValue::Integer)
            .map_err(|source| DecodeError::Integer {
                value: raw.to_string(),
                source,
            }),
        ValueType::Float => raw
            .parse::<f64>()
            .map(ConfigValue::Float)
            .map_err(|source| DecodeError::Float {
                value: raw.to_string(),
                source,
            }),
        ValueType::Json => Ok(ConfigValue::Json(serde_json::from_str(raw)?)),
        ValueType::String => Ok(ConfigValue::String(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Ensures every documented tag selects its rule and unknown tags fall back to strings.
    #[test]
    fn from_tag_maps_known_tags() {
        assert_eq!(ValueType::from_tag(Some("Boolean")), ValueType::Boolean);
        assert_eq!(ValueType::from_tag(Some("Integer")), ValueType::Integer);
        assert_eq!(ValueType::from_tag(Some("Long")), ValueType::Integer);
        assert_eq!(ValueType::from_tag(Some("Float")), ValueType::Float);
        assert_eq!(ValueType::from_tag(Some("Double")), ValueType::Float);
        assert_eq!(ValueType::from_tag(Some("JSON")), ValueType::Json);
        assert_eq!(ValueType::from_tag(None), ValueType::String);
        assert_eq!(ValueType::from_tag(Some("Password")), ValueType::String);
        // Tags are matched literally.
        assert_eq!(ValueType::from_tag(Some("boolean")), ValueType::String);
        assert_eq!(ValueType::from_tag(Some("json")), ValueType::String);
    }

    #[test]
    fn booleans_are_true_only_for_the_literal_true() {
        assert_eq!(
            decode("true", ValueType::Boolean).unwrap(),
            ConfigValue::Bool(true)
        );
        assert_eq!(
            decode("false", ValueType::Boolean).unwrap(),
            ConfigValue::Bool(false)
        );
        assert_eq!(
            decode("TRUE", ValueType::Boolean).unwrap(),
            ConfigValue::Bool(false)
        );
        assert_eq!(
            decode("yes", ValueType::Boolean).unwrap(),
            ConfigValue::Bool(false)
        );
    }

    #[test]
    fn numbers_decode_to_integers_and_floats() {
        assert_eq!(
            decode("2", ValueType::Integer).unwrap(),
            ConfigValue::Integer(2)
        );
        assert_eq!(
            decode("-17", ValueType::Integer).unwrap(),
            ConfigValue::Integer(-17)
        );
        assert_eq!(decode("2", ValueType::Float).unwrap(), ConfigValue::Float(2.0));
        assert_eq!(
            decode("0.25", ValueType::Float).unwrap(),
            ConfigValue::Float(0.25)
        );
    }

    /// Malformed numeric values must surface as errors instead of defaults.
    #[test]
    fn malformed_numbers_are_errors() {
        assert!(matches!(
            decode("two", ValueType::Integer),
            Err(DecodeError::Integer { .. })
        ));
        assert!(matches!(
            decode("2.5", ValueType::Integer),
            Err(DecodeError::Integer { .. })
        ));
        assert!(matches!(
            decode("", ValueType::Float),
            Err(DecodeError::Float { .. })
        ));
    }

    #[test]
    fn json_values_are_parsed() {
        let decoded = decode(r#"{"key": "value"}"#, ValueType::Json).unwrap();
        assert_eq!(decoded, ConfigValue::Json(json!({"key": "value"})));
        assert_eq!(
            decoded.as_json().and_then(|v| v.get("key")),
            Some(&json!("value"))
        );

        let err = decode("{not json", ValueType::Json).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
        assert!(err.to_string().starts_with("invalid JSON payload"));
    }

    #[test]
    fn strings_pass_through_unchanged() {
        let decoded = decode(" http://example.com ", ValueType::String).unwrap();
        assert_eq!(decoded.as_str(), Some(" http://example.com "));
    }

    #[test]
    fn accessors_only_match_their_variant() {
        assert_eq!(ConfigValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ConfigValue::Bool(true).as_i64(), None);
        assert_eq!(ConfigValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(ConfigValue::Float(1.5).as_i64(), None);
        assert_eq!(ConfigValue::from("foo").as_str(), Some("foo"));
        assert_eq!(ConfigValue::from(json!([1, 2])).to_string(), "[1,2]");
    }
}
