//! KV engine request shaping
//!
//! Maps a mount-relative secret path onto the API path for each KV engine
//! version and builds write bodies.

use crate::secret::LeafPayload;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// KV secrets engine API version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KvVersion {
    /// Flat writes at `mount/path`
    V1,
    /// Versioned writes at `mount/data/path`, fields wrapped under `data`
    #[default]
    V2,
}

impl KvVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            KvVersion::V1 => "1",
            KvVersion::V2 => "2",
        }
    }
}

impl fmt::Display for KvVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KvVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches(['v', 'V']) {
            "1" => Ok(KvVersion::V1),
            "2" => Ok(KvVersion::V2),
            other => Err(format!("unknown KV engine version '{}' (expected 1 or 2)", other)),
        }
    }
}

impl Serialize for KvVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for KvVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => n.to_string().parse(),
            Repr::Text(s) => s.parse(),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// A shaped write: target API path (below `v1/`) and literal JSON body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub api_path: String,
    pub body: String,
}

/// Shape the write of one leaf for the given engine version.
///
/// A raw object is sent as is; under version 2 it is wrapped by string
/// composition since the raw text may already be serialized in its own way.
pub fn shape_write(
    version: KvVersion,
    mount: &str,
    path: &str,
    payload: &LeafPayload,
) -> WriteRequest {
    let body = match (payload, version) {
        (LeafPayload::FieldMap(fields), KvVersion::V1) => {
            serde_json::Value::Object(fields.clone()).to_string()
        }
        (LeafPayload::FieldMap(fields), KvVersion::V2) => {
            serde_json::json!({ "data": fields }).to_string()
        }
        (LeafPayload::RawObject(raw), KvVersion::V1) => raw.clone(),
        (LeafPayload::RawObject(raw), KvVersion::V2) => format!("{{\"data\":{}}}", raw),
    };

    WriteRequest {
        api_path: data_path(version, mount, path),
        body,
    }
}

/// API path for reading or writing a secret
pub fn data_path(version: KvVersion, mount: &str, path: &str) -> String {
    match version {
        KvVersion::V1 => join(&[mount, path]),
        KvVersion::V2 => join(&[mount, "data", path]),
    }
}

/// API path for listing a folder; keeps the trailing separator of `path`
pub fn list_path(version: KvVersion, mount: &str, path: &str) -> String {
    let base = match version {
        KvVersion::V1 => join(&[mount, path]),
        KvVersion::V2 => join(&[mount, "metadata", path]),
    };
    format!("{}/", base)
}

fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
