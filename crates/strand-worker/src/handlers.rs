//! Handler registrations carried through the outbound chain.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use strand_protocols::{
    decode_arguments, encode, DataConversionError, EncodedValues, PayloadConverter, Payloads,
    WorkflowError,
};

/// Decodes a signal's arguments and runs the user handler.
///
/// Receives the payloads and the source event id. An `Err` means the
/// payloads did not fit the handler's argument shape.
pub type SignalCallback = Arc<
    dyn Fn(&dyn PayloadConverter, Option<&Payloads>, i64) -> Result<(), DataConversionError>
        + Send
        + Sync,
>;

/// Decodes a query's arguments, runs the user handler and encodes its answer.
pub type QueryCallback = Arc<
    dyn Fn(&dyn PayloadConverter, Option<&Payloads>) -> Result<Option<Payloads>, WorkflowError>
        + Send
        + Sync,
>;

/// One signal occurrence waiting for a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRecord {
    pub signal_name: String,
    pub payloads: Option<Payloads>,
    /// Position in the source history. Diagnostic only.
    pub event_id: i64,
}

/// Binding of a signal name to a handler.
#[derive(Clone)]
pub struct SignalRegistrationRequest {
    pub(crate) signal_type: String,
    pub(crate) callback: SignalCallback,
}

impl SignalRegistrationRequest {
    /// Bind `signal_type` to a handler taking the decoded arguments.
    ///
    /// `A` follows the argument decoding rule: `()` for no arguments, the
    /// value itself for one, a tuple for several.
    pub fn new<A, F>(signal_type: impl Into<String>, handler: F) -> Self
    where
        A: DeserializeOwned + 'static,
        F: Fn(A) + Send + Sync + 'static,
    {
        Self::with_event_id(signal_type, move |args: A, _event_id: i64| handler(args))
    }

    /// Like [`new`](Self::new), also passing the source event id.
    pub fn with_event_id<A, F>(signal_type: impl Into<String>, handler: F) -> Self
    where
        A: DeserializeOwned + 'static,
        F: Fn(A, i64) + Send + Sync + 'static,
    {
        let callback: SignalCallback = Arc::new(
            move |converter: &dyn PayloadConverter, payloads: Option<&Payloads>, event_id: i64| {
                let args = decode_arguments::<A>(converter, payloads)?;
                handler(args, event_id);
                Ok(())
            },
        );
        Self::from_callback(signal_type, callback)
    }

    /// Bind `signal_type` to a raw callback that decodes for itself.
    pub fn from_callback(signal_type: impl Into<String>, callback: SignalCallback) -> Self {
        Self {
            signal_type: signal_type.into(),
            callback,
        }
    }

    pub fn signal_type(&self) -> &str {
        &self.signal_type
    }

    pub fn callback(&self) -> &SignalCallback {
        &self.callback
    }
}

impl std::fmt::Debug for SignalRegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalRegistrationRequest")
            .field("signal_type", &self.signal_type)
            .finish_non_exhaustive()
    }
}

/// Fallback receiving every signal with no named handler.
///
/// Returning `Err` reports an argument that could not be decoded; the
/// dispatcher logs and meters it, then drops the signal.
pub trait DynamicSignalHandler: Send + Sync {
    fn handle(&self, signal_name: &str, args: EncodedValues) -> Result<(), DataConversionError>;
}

impl<F> DynamicSignalHandler for F
where
    F: Fn(&str, EncodedValues) -> Result<(), DataConversionError> + Send + Sync,
{
    fn handle(&self, signal_name: &str, args: EncodedValues) -> Result<(), DataConversionError> {
        self(signal_name, args)
    }
}

/// Binding of a query type to a handler.
#[derive(Clone)]
pub struct QueryRegistrationRequest {
    pub(crate) query_type: String,
    pub(crate) callback: QueryCallback,
}

impl QueryRegistrationRequest {
    /// Bind `query_type` to a handler whose answer is encoded as one payload.
    pub fn new<A, R, F>(query_type: impl Into<String>, handler: F) -> Self
    where
        A: DeserializeOwned + 'static,
        R: Serialize + 'static,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        let callback: QueryCallback = Arc::new(
            move |converter: &dyn PayloadConverter, payloads: Option<&Payloads>| {
                let args = decode_arguments::<A>(converter, payloads)?;
                let answer = encode(converter, &handler(args))?;
                Ok(Some(Payloads::single(answer)))
            },
        );
        Self::from_callback(query_type, callback)
    }

    pub fn from_callback(query_type: impl Into<String>, callback: QueryCallback) -> Self {
        Self {
            query_type: query_type.into(),
            callback,
        }
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }
}

impl std::fmt::Debug for QueryRegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRegistrationRequest")
            .field("query_type", &self.query_type)
            .finish_non_exhaustive()
    }
}
