//! Payload codec contract and the default JSON implementation.
//!
//! Converters work on `serde_json::Value` so the trait stays object safe;
//! the free functions [`encode`], [`decode`] and [`decode_arguments`] add
//! the typed layer on top.

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::DataConversionError;
use crate::types::{Payload, Payloads, ENCODING_JSON, ENCODING_NULL};

/// Converts values to and from opaque payloads.
pub trait PayloadConverter: Send + Sync {
    /// Serialize a value into a payload.
    fn to_payload(&self, value: &Value) -> Result<Payload, DataConversionError>;

    /// Deserialize a payload back into a value.
    fn from_payload(&self, payload: &Payload) -> Result<Value, DataConversionError>;
}

/// JSON converter: `null` becomes a `binary/null` payload, everything else
/// a `json/plain` payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayloadConverter;

impl PayloadConverter for JsonPayloadConverter {
    fn to_payload(&self, value: &Value) -> Result<Payload, DataConversionError> {
        if value.is_null() {
            return Ok(Payload::new(ENCODING_NULL, Bytes::new()));
        }
        let data = serde_json::to_vec(value)?;
        Ok(Payload::new(ENCODING_JSON, data))
    }

    fn from_payload(&self, payload: &Payload) -> Result<Value, DataConversionError> {
        match payload.encoding() {
            Some(ENCODING_JSON) => serde_json::from_slice(&payload.data)
                .map_err(|e| DataConversionError::Decoding(e.to_string())),
            Some(ENCODING_NULL) => Ok(Value::Null),
            Some(other) => Err(DataConversionError::UnsupportedEncoding(other.to_string())),
            None => Err(DataConversionError::MissingEncoding),
        }
    }
}

/// Encode a typed value into a single payload.
pub fn encode<T: Serialize + ?Sized>(
    converter: &dyn PayloadConverter,
    value: &T,
) -> Result<Payload, DataConversionError> {
    let value =
        serde_json::to_value(value).map_err(|e| DataConversionError::Encoding(e.to_string()))?;
    converter.to_payload(&value)
}

/// Decode a single payload into a typed value.
pub fn decode<T: DeserializeOwned>(
    converter: &dyn PayloadConverter,
    payload: &Payload,
) -> Result<T, DataConversionError> {
    let value = converter.from_payload(payload)?;
    serde_json::from_value(value).map_err(|e| DataConversionError::Decoding(e.to_string()))
}

/// Decode an argument list into the shape `T`.
///
/// No payloads decode from `null` (so `()` and `Option<_>` fit), one payload
/// decodes from its own value, several decode from an array of their values
/// (so tuples fit).
pub fn decode_arguments<T: DeserializeOwned>(
    converter: &dyn PayloadConverter,
    payloads: Option<&Payloads>,
) -> Result<T, DataConversionError> {
    let value = match payloads {
        None => Value::Null,
        Some(payloads) => match payloads.len() {
            0 => Value::Null,
            1 => match payloads.get(0) {
                Some(payload) => converter.from_payload(payload)?,
                None => Value::Null,
            },
            _ => Value::Array(
                payloads
                    .iter()
                    .map(|p| converter.from_payload(p))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        },
    };
    serde_json::from_value(value).map_err(|e| DataConversionError::Decoding(e.to_string()))
}

/// Lazily decoded argument list handed to untyped handlers.
#[derive(Clone)]
pub struct EncodedValues {
    payloads: Option<Payloads>,
    converter: Arc<dyn PayloadConverter>,
}

impl EncodedValues {
    pub fn new(payloads: Option<Payloads>, converter: Arc<dyn PayloadConverter>) -> Self {
        Self {
            payloads,
            converter,
        }
    }

    pub fn len(&self) -> usize {
        self.payloads.as_ref().map_or(0, Payloads::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn payloads(&self) -> Option<&Payloads> {
        self.payloads.as_ref()
    }

    /// Decode the argument at `index`.
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, DataConversionError> {
        let payload = self
            .payloads
            .as_ref()
            .and_then(|p| p.get(index))
            .ok_or(DataConversionError::MissingArgument {
                index,
                count: self.len(),
            })?;
        decode(self.converter.as_ref(), payload)
    }

    /// Decode the whole argument list as one shape, see [`decode_arguments`].
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DataConversionError> {
        decode_arguments(self.converter.as_ref(), self.payloads.as_ref())
    }
}

impl std::fmt::Debug for EncodedValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedValues")
            .field("payloads", &self.payloads)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "converter_tests.rs"]
mod tests;
