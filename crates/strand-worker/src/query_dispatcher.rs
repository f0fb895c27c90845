//! Name-keyed registry of query handlers.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use strand_protocols::{PayloadConverter, Payloads, WorkflowError};

use crate::handlers::{QueryCallback, QueryRegistrationRequest};

/// Query handlers of one workflow instance.
///
/// Queries are synchronous reads: there is no buffering, and a decode
/// failure goes back to the caller.
pub struct QueryDispatcher {
    converter: Arc<dyn PayloadConverter>,
    handlers: DashMap<String, QueryCallback>,
}

impl QueryDispatcher {
    pub fn new(converter: Arc<dyn PayloadConverter>) -> Self {
        Self {
            converter,
            handlers: DashMap::new(),
        }
    }

    /// Register a handler. A second handler for the same type is `IllegalState`.
    pub fn register(&self, request: QueryRegistrationRequest) -> Result<(), WorkflowError> {
        match self.handlers.entry(request.query_type) {
            Entry::Occupied(entry) => Err(WorkflowError::illegal_state(format!(
                "Query handler for \"{}\" is already registered",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                debug!(query_type = %entry.key(), "Registered query handler");
                entry.insert(request.callback);
                Ok(())
            }
        }
    }

    /// Answer a query.
    pub fn handle(
        &self,
        query_type: &str,
        args: Option<&Payloads>,
    ) -> Result<Option<Payloads>, WorkflowError> {
        let callback = self
            .handlers
            .get(query_type)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| WorkflowError::UnknownQuery {
                query_type: query_type.to_string(),
                known: self.query_types(),
            })?;
        callback(self.converter.as_ref(), args)
    }

    /// Registered query types, sorted.
    pub fn query_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        types.sort();
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_protocols::{decode_arguments, encode, JsonPayloadConverter};

    fn dispatcher() -> QueryDispatcher {
        QueryDispatcher::new(Arc::new(JsonPayloadConverter))
    }

    #[test]
    fn test_handle_registered_query() {
        let queries = dispatcher();
        queries
            .register(QueryRegistrationRequest::new("greeting", |name: String| {
                format!("hello {name}")
            }))
            .unwrap();

        let args = Payloads::single(encode(&JsonPayloadConverter, "bob").unwrap());
        let answer = queries.handle("greeting", Some(&args)).unwrap();
        let text: String = decode_arguments(&JsonPayloadConverter, answer.as_ref()).unwrap();
        assert_eq!(text, "hello bob");
    }

    #[test]
    fn test_duplicate_query_is_illegal_state() {
        let queries = dispatcher();
        queries
            .register(QueryRegistrationRequest::new("status", |_: ()| 1))
            .unwrap();
        let err = queries
            .register(QueryRegistrationRequest::new("status", |_: ()| 2))
            .unwrap_err();
        assert!(err.is_illegal_state());

        let answer = queries.handle("status", None).unwrap();
        let value: i32 = decode_arguments(&JsonPayloadConverter, answer.as_ref()).unwrap();
        assert_eq!(value, 1);
    }

    #[test]
    fn test_unknown_query_lists_known_types() {
        let queries = dispatcher();
        queries
            .register(QueryRegistrationRequest::new("b", |_: ()| 0))
            .unwrap();
        queries
            .register(QueryRegistrationRequest::new("a", |_: ()| 0))
            .unwrap();

        match queries.handle("c", None) {
            Err(WorkflowError::UnknownQuery { query_type, known }) => {
                assert_eq!(query_type, "c");
                assert_eq!(known, vec!["a", "b"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_decode_failure_reaches_caller() {
        let queries = dispatcher();
        queries
            .register(QueryRegistrationRequest::new("square", |n: u32| n * n))
            .unwrap();
        let args = Payloads::single(encode(&JsonPayloadConverter, "four").unwrap());
        let err = queries.handle("square", Some(&args)).unwrap_err();
        assert!(matches!(err, WorkflowError::DataConversion(_)));
    }
}
