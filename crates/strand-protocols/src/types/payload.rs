//! Opaque payloads and headers.

use std::collections::HashMap;

use bytes::Bytes;

/// Metadata key carrying the payload encoding.
pub const METADATA_ENCODING_KEY: &str = "encoding";

/// Encoding of JSON payloads.
pub const ENCODING_JSON: &str = "json/plain";

/// Encoding of an explicit null value.
pub const ENCODING_NULL: &str = "binary/null";

/// A single serialized value.
///
/// The runtime never looks inside `data`; only a [`PayloadConverter`] does.
///
/// [`PayloadConverter`]: crate::PayloadConverter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub metadata: HashMap<String, Bytes>,
    pub data: Bytes,
}

impl Payload {
    /// Create a payload with the given encoding and data.
    pub fn new(encoding: &str, data: impl Into<Bytes>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(
            METADATA_ENCODING_KEY.to_string(),
            Bytes::copy_from_slice(encoding.as_bytes()),
        );
        Self {
            metadata,
            data: data.into(),
        }
    }

    /// Get the encoding recorded in the metadata, if it is valid UTF-8.
    pub fn encoding(&self) -> Option<&str> {
        self.metadata
            .get(METADATA_ENCODING_KEY)
            .and_then(|raw| std::str::from_utf8(raw).ok())
    }
}

/// An ordered list of payloads, one per argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payloads(Vec<Payload>);

impl Payloads {
    pub fn new(payloads: Vec<Payload>) -> Self {
        Self(payloads)
    }

    pub fn single(payload: Payload) -> Self {
        Self(vec![payload])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Payload> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Payload> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Payload> {
        self.0
    }
}

impl From<Vec<Payload>> for Payloads {
    fn from(payloads: Vec<Payload>) -> Self {
        Self(payloads)
    }
}

impl From<Payload> for Payloads {
    fn from(payload: Payload) -> Self {
        Self::single(payload)
    }
}

impl<'a> IntoIterator for &'a Payloads {
    type Item = &'a Payload;
    type IntoIter = std::slice::Iter<'a, Payload>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Call headers propagated alongside arguments.
///
/// Interceptors use headers to carry cross-cutting context (trace ids,
/// auth tokens) across a call boundary without touching the arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    fields: HashMap<String, Payload>,
}

impl Header {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Payload> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Payload) {
        self.fields.insert(key.into(), value);
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: Payload) -> Self {
        self.insert(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &HashMap<String, Payload> {
        &self.fields
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
