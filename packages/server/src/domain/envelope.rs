//! Wire message shape: `{ "kind": "<domain>:<action>", "data": { ... } }`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::{error::ValueObjectError, value_object::Kind};

/// Open key-value payload; each handler interprets its own shape.
pub type Payload = Map<String, Value>;

/// Message unit exchanged over the transport, in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Payload,
}

impl Envelope {
    pub fn new(kind: &Kind, data: Payload) -> Self {
        Self {
            kind: kind.to_string(),
            data,
        }
    }

    /// Decode one text frame.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Encode for a text frame.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse the `kind` field into its domain and action.
    pub fn parsed_kind(&self) -> Result<Kind, ValueObjectError> {
        Kind::parse(&self.kind)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Payload, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Payload>::deserialize(deserializer).map(Option::unwrap_or_default)
}
