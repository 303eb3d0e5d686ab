//! Secret payload types
//!
//! A leaf in the store holds either a plain field map or a pre-serialized JSON
//! object. The distinction is made once, when the payload is constructed, and
//! carried as a tagged variant from then on.

use crate::error::AccessError;
use serde_json::{Map, Value};

/// Field key marking a payload whose value is a raw serialized JSON object
pub const RAW_OBJECT_KEY: &str = "json-object";

/// Document key holding a folder's attached secret. Store keys are never
/// empty, so it cannot clash with a child.
pub const ATTACHED_SECRET_KEY: &str = "";

/// Field name to value mapping of a single secret
pub type FieldMap = Map<String, Value>;

/// Data stored at one leaf path
#[derive(Debug, Clone, PartialEq)]
pub enum LeafPayload {
    /// Plain key/value fields
    FieldMap(FieldMap),
    /// A serialized JSON object sent to the store verbatim
    RawObject(String),
}

impl LeafPayload {
    /// Build a payload from user-authored fields (an import document).
    ///
    /// A map holding the raw-object key becomes `RawObject`; the key's value
    /// must be a string.
    pub fn from_fields(path: &str, mut fields: FieldMap) -> Result<Self, AccessError> {
        match fields.remove(RAW_OBJECT_KEY) {
            None => Ok(LeafPayload::FieldMap(fields)),
            Some(Value::String(raw)) => {
                if !fields.is_empty() {
                    tracing::warn!(
                        path,
                        ignored = fields.len(),
                        "Fields next to {} are ignored",
                        RAW_OBJECT_KEY
                    );
                }
                Ok(LeafPayload::RawObject(raw))
            }
            Some(other) => Err(AccessError::malformed(
                path,
                format!(
                    "{} must hold a serialized object string, found {}",
                    RAW_OBJECT_KEY,
                    value_kind(&other)
                ),
            )),
        }
    }

    /// Build a payload from secret data read back from the store.
    ///
    /// Data that is not a flat map of scalars cannot be represented as plain
    /// fields, so it is kept as its compact JSON text.
    pub fn from_store_data(data: FieldMap) -> Self {
        let flat = !data.contains_key(RAW_OBJECT_KEY) && data.values().all(is_scalar);
        if flat {
            LeafPayload::FieldMap(data)
        } else {
            LeafPayload::RawObject(Value::Object(data).to_string())
        }
    }

    /// Document representation used by export files.
    ///
    /// A field map that would read back as something else (a folder of
    /// placeholders, a sentinel, nested data) is written in raw form.
    pub fn to_value(&self) -> Value {
        match self {
            LeafPayload::FieldMap(fields) if !reads_back_as_fields(fields) => {
                raw_value(Value::Object(fields.clone()).to_string())
            }
            LeafPayload::FieldMap(fields) => Value::Object(fields.clone()),
            LeafPayload::RawObject(raw) => raw_value(raw.clone()),
        }
    }
}

/// Value returned for a leaf during export
#[derive(Debug, Clone, PartialEq)]
pub enum LeafSecret {
    /// Placeholder for a leaf whose value was not read
    Redacted,
    Revealed(LeafPayload),
}

impl LeafSecret {
    pub fn payload(&self) -> Option<&LeafPayload> {
        match self {
            LeafSecret::Redacted => None,
            LeafSecret::Revealed(payload) => Some(payload),
        }
    }

    pub fn is_redacted(&self) -> bool {
        matches!(self, LeafSecret::Redacted)
    }

    /// Document representation; the placeholder is the empty string
    pub fn to_value(&self) -> Value {
        match self {
            LeafSecret::Redacted => Value::String(String::new()),
            LeafSecret::Revealed(payload) => payload.to_value(),
        }
    }
}

impl From<LeafPayload> for LeafSecret {
    fn from(payload: LeafPayload) -> Self {
        LeafSecret::Revealed(payload)
    }
}

fn raw_value(raw: String) -> Value {
    let mut map = Map::new();
    map.insert(RAW_OBJECT_KEY.to_string(), Value::String(raw));
    Value::Object(map)
}

fn reads_back_as_fields(fields: &FieldMap) -> bool {
    !fields.contains_key(RAW_OBJECT_KEY)
        && !fields.contains_key(ATTACHED_SECRET_KEY)
        && fields.values().all(is_scalar)
        && (fields.is_empty() || !fields.values().all(is_placeholder))
}

/// The redacted-leaf placeholder: an empty string
pub(crate) fn is_placeholder(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

pub(crate) fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
