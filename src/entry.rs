use crate::error::{MfafError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// MIME type assigned to entries that do not declare one
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Maximum nesting depth of an attribute map (the root map counts as 1)
pub const MAX_ATTRIBUTE_DEPTH: usize = 3;

/// Maximum attribute key length in UTF-8 bytes
pub const MAX_ATTRIBUTE_KEY_LENGTH: usize = 256;

/// Attribute value: a scalar or a nested map
///
/// Untagged, so the wire form is the plain MessagePack value. Values outside
/// this domain (arrays, binary) fail to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Map(BTreeMap<String, AttrValue>),
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

/// A single named byte stream plus its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub content: Vec<u8>,
    pub mime_type: String,
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Entry {
    /// Create an entry with the default MIME type and no attributes
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set the MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Attach an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Content length in bytes
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Check the name and attribute constraints
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(MfafError::Range("entry name must be non-empty".to_string()));
        }
        validate_attributes(&self.attributes)
    }
}

/// Enforce key-length and nesting-depth limits over an attribute map
pub(crate) fn validate_attributes(attributes: &BTreeMap<String, AttrValue>) -> Result<()> {
    validate_map(attributes, 1)
}

fn validate_map(map: &BTreeMap<String, AttrValue>, depth: usize) -> Result<()> {
    for (key, value) in map {
        if key.len() > MAX_ATTRIBUTE_KEY_LENGTH {
            return Err(MfafError::Range(format!(
                "attribute key exceeds {} bytes: {} bytes",
                MAX_ATTRIBUTE_KEY_LENGTH,
                key.len()
            )));
        }
        if let AttrValue::Map(nested) = value {
            if depth >= MAX_ATTRIBUTE_DEPTH {
                return Err(MfafError::Range(format!(
                    "attribute map nesting exceeds depth {}",
                    MAX_ATTRIBUTE_DEPTH
                )));
            }
            validate_map(nested, depth + 1)?;
        }
    }
    Ok(())
}
