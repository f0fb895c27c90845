//! Routing of signals to workflow-registered handlers.
//!
//! Lookup order for an incoming signal is fixed: a named binding, then the
//! dynamic handler, then the buffer. Buffered records are replayed, in
//! arrival order, whenever a registration could resolve them.
//!
//! The internal lock is never held while a handler runs, so handlers may
//! register further handlers.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, warn};

use strand_protocols::{
    Counter, DataConversionError, EncodedValues, MetricsScope, PayloadConverter, Payloads,
    WorkflowError,
};

use crate::handlers::{DynamicSignalHandler, SignalCallback, SignalRecord, SignalRegistrationRequest};
use crate::metrics::CORRUPTED_SIGNALS_COUNTER;

#[derive(Default)]
struct DispatcherState {
    bindings: HashMap<String, SignalCallback>,
    dynamic: Option<Arc<dyn DynamicSignalHandler>>,
    buffer: VecDeque<SignalRecord>,
}

enum Route {
    Named(SignalCallback),
    Dynamic(Arc<dyn DynamicSignalHandler>),
}

/// Signal router owned by one workflow instance.
pub struct SignalDispatcher {
    converter: Arc<dyn PayloadConverter>,
    corrupted_signals: Arc<dyn Counter>,
    buffer_warn_threshold: Option<usize>,
    state: Mutex<DispatcherState>,
}

impl SignalDispatcher {
    pub fn new(converter: Arc<dyn PayloadConverter>, metrics: &dyn MetricsScope) -> Self {
        Self {
            converter,
            corrupted_signals: metrics.counter(CORRUPTED_SIGNALS_COUNTER),
            buffer_warn_threshold: None,
            state: Mutex::new(DispatcherState::default()),
        }
    }

    /// Log a warning when the buffer grows past `threshold` records.
    ///
    /// The buffer stays unbounded; nothing is evicted.
    pub fn with_buffer_warn_threshold(mut self, threshold: Option<usize>) -> Self {
        self.buffer_warn_threshold = threshold;
        self
    }

    /// Deliver one signal, or buffer it when nothing can handle it yet.
    ///
    /// Never fails: a payload that does not decode is logged, counted and
    /// dropped.
    pub fn signal(&self, signal_name: &str, payloads: Option<Payloads>, event_id: i64) {
        let route = {
            let mut state = self.state.lock();
            if let Some(callback) = state.bindings.get(signal_name) {
                Route::Named(callback.clone())
            } else if let Some(handler) = &state.dynamic {
                Route::Dynamic(handler.clone())
            } else {
                state.buffer.push_back(SignalRecord {
                    signal_name: signal_name.to_string(),
                    payloads,
                    event_id,
                });
                let buffered = state.buffer.len();
                debug!(signal_name, event_id, buffered, "Buffered signal with no handler");
                if let Some(threshold) = self.buffer_warn_threshold {
                    if buffered == threshold + 1 {
                        warn!(buffered, threshold, "Signal buffer exceeded warning threshold");
                    }
                }
                return;
            }
        };

        let result = match route {
            Route::Named(callback) => callback(self.converter.as_ref(), payloads.as_ref(), event_id),
            Route::Dynamic(handler) => {
                handler.handle(signal_name, EncodedValues::new(payloads, self.converter.clone()))
            }
        };
        if let Err(e) = result {
            self.drop_corrupted(signal_name, event_id, &e);
        }
    }

    fn drop_corrupted(&self, signal_name: &str, event_id: i64, cause: &DataConversionError) {
        error!(
            signal_name,
            event_id,
            error = %cause,
            "Dropping signal whose payload could not be decoded"
        );
        self.corrupted_signals.inc(1);
    }

    /// Bind every request, then replay the buffer.
    ///
    /// A name that is already bound, or appears twice in `requests`, fails
    /// the whole batch with `IllegalState` before anything is bound.
    pub fn register_signal_handlers(
        &self,
        requests: Vec<SignalRegistrationRequest>,
    ) -> Result<(), WorkflowError> {
        let pending = {
            let mut state = self.state.lock();
            {
                let mut batch = HashSet::with_capacity(requests.len());
                for request in &requests {
                    let name = request.signal_type();
                    if state.bindings.contains_key(name) || !batch.insert(name) {
                        return Err(WorkflowError::illegal_state(format!(
                            "Signal handler for \"{name}\" is already registered"
                        )));
                    }
                }
            }
            for request in requests {
                debug!(signal_name = %request.signal_type, "Registered signal handler");
                state.bindings.insert(request.signal_type, request.callback);
            }
            std::mem::take(&mut state.buffer)
        };
        self.replay(pending);
        Ok(())
    }

    /// Install the fallback handler and hand it every buffered record.
    ///
    /// At most one dynamic handler may be registered.
    pub fn register_dynamic_signal_handler(
        &self,
        handler: Arc<dyn DynamicSignalHandler>,
    ) -> Result<(), WorkflowError> {
        let pending = {
            let mut state = self.state.lock();
            if state.dynamic.is_some() {
                return Err(WorkflowError::illegal_state(
                    "Dynamic signal handler is already registered",
                ));
            }
            state.dynamic = Some(handler);
            debug!("Registered dynamic signal handler");
            std::mem::take(&mut state.buffer)
        };
        self.replay(pending);
        Ok(())
    }

    /// Redeliver drained records; those still unresolved go back to the buffer.
    fn replay(&self, pending: VecDeque<SignalRecord>) {
        for record in pending {
            debug!(
                signal_name = %record.signal_name,
                event_id = record.event_id,
                "Replaying buffered signal"
            );
            self.signal(&record.signal_name, record.payloads, record.event_id);
        }
    }

    pub fn has_handler(&self, signal_name: &str) -> bool {
        self.state.lock().bindings.contains_key(signal_name)
    }

    pub fn has_dynamic_handler(&self) -> bool {
        self.state.lock().dynamic.is_some()
    }

    /// Buffered records in arrival order.
    pub fn buffered_signals(&self) -> Vec<SignalRecord> {
        self.state.lock().buffer.iter().cloned().collect()
    }

    pub fn buffered_count(&self) -> usize {
        self.state.lock().buffer.len()
    }
}

impl std::fmt::Debug for SignalDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SignalDispatcher")
            .field("handlers", &state.bindings.len())
            .field("dynamic", &state.dynamic.is_some())
            .field("buffered", &state.buffer.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "signal_dispatcher_tests.rs"]
mod tests;
