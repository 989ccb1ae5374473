use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// A single version as published by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version: String,

    /// Publication date, when the registry includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Any other fields the registry sends along, kept for JSON output.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VersionRecord {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            date: None,
            extra: Map::new(),
        }
    }
}

/// The body of a registry answer.
///
/// The registry either answers with a bare list of versions, or wraps the list in an
/// object whose `key` field names the field holding the list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RegistryResponse {
    Bare(Vec<VersionRecord>),
    Envelope(Envelope),
    Unrecognized(Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    pub key: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RegistryResponse {
    /// Unwraps the envelope, once, into the list of versions.
    ///
    /// Shapes that do not carry a list of versions unwrap to an empty list.
    pub fn into_versions(self) -> Vec<VersionRecord> {
        match self {
            Self::Bare(versions) => versions,
            Self::Envelope(Envelope { key, mut fields }) => {
                let Some(payload) = fields.remove(&key) else {
                    warn!("Registry envelope names missing field {key:?}");
                    return Vec::new();
                };
                match serde_json::from_value(payload) {
                    Ok(versions) => versions,
                    Err(err) => {
                        warn!("Registry envelope field {key:?} is not a version list: {err}");
                        Vec::new()
                    }
                }
            }
            Self::Unrecognized(value) => {
                warn!("Unrecognized registry response: {value}");
                Vec::new()
            }
        }
    }
}
