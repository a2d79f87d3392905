//! In-memory representation of a pulled configuration document.
//!
//! A [`Snapshot`] is built once from the body of a successful pull and never
//! mutated afterwards; the client replaces it wholesale on the next pull.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::value::{decode, ConfigValue, DecodeError, ValueType};

/// A single configuration property as delivered by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Raw value. `None` marks a property that is provisioned but intentionally empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val: Option<String>,
    /// Type tag driving decoding (`Boolean`, `Integer`, `JSON`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

impl Property {
    /// Decoding rule selected by this property's type tag.
    pub fn value_type(&self) -> ValueType {
        ValueType::from_tag(self.value_type.as_deref())
    }

    /// Decodes the raw value, returning `None` for intentionally empty properties.
    pub fn decode(&self) -> Result<Option<ConfigValue>, DecodeError> {
        self.val
            .as_deref()
            .map(|raw| decode(raw, self.value_type()))
            .transpose()
    }
}

/// A file embedded in the pull response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub content: String,
    #[serde(
        rename = "content-type",
        alias = "content_type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
}

/// Outcome of looking a key up in the property map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The key was never provisioned.
    Missing,
    /// The key exists but carries no value.
    Empty,
    /// The key exists with a value.
    Present(&'a Property),
}

/// Configuration document returned by `/rest/pull`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: HashMap<String, Property>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: HashMap<String, FileEntry>,
    /// Remaining top-level fields, carried through without interpretation.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Treats an explicit `null` section the same as a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<HashMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<HashMap<String, T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Snapshot {
    /// Parses a pull response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Three-way lookup separating unknown keys from intentionally empty ones.
    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        match self.properties.get(key) {
            None => Lookup::Missing,
            Some(property) if property.val.is_none() => Lookup::Empty,
            Some(property) => Lookup::Present(property),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Projects every property onto its raw, undecoded value.
    pub fn raw_values(&self) -> HashMap<String, Option<String>> {
        self.properties
            .iter()
            .map(|(key, property)| (key.clone(), property.val.clone()))
            .collect()
    }

    /// Returns the content of an embedded file, if the pull carried it.
    pub fn file_content(&self, key: &str) -> Option<&str> {
        self.files.get(key).map(|file| file.content.as_str())
    }

    pub fn generated_on(&self) -> Option<&str> {
        self.metadata_str("generatedOn")
    }

    pub fn account(&self) -> Option<&str> {
        self.metadata_str("account")
    }

    pub fn repo(&self) -> Option<&str> {
        self.metadata_str("repo")
    }

    /// Context echoed back by the server (not necessarily the one requested).
    pub fn context(&self) -> Option<&str> {
        self.metadata_str("context")
    }

    fn metadata_str(&self, field: &str) -> Option<&str> {
        self.metadata.get(field).and_then(Value::as_str)
    }
}
