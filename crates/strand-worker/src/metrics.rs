//! In-process metrics scope backed by atomic counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use strand_protocols::{Counter, MetricsScope};

/// Incremented once per signal dropped because its payload could not be decoded.
pub const CORRUPTED_SIGNALS_COUNTER: &str = "corrupted_signals";

/// A counter holding its total in an `AtomicU64`.
#[derive(Debug, Default)]
pub struct AtomicCounter {
    value: AtomicU64,
}

impl AtomicCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current total.
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Counter for AtomicCounter {
    fn inc(&self, delta: u64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }
}

/// Metrics scope keeping every counter in memory.
///
/// Asking twice for the same name returns the same counter.
#[derive(Debug, Default)]
pub struct InMemoryMetricsScope {
    counters: DashMap<String, Arc<AtomicCounter>>,
}

impl InMemoryMetricsScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total of the named counter, zero if it was never created.
    pub fn counter_value(&self, name: &str) -> u64 {
        self.counters.get(name).map_or(0, |c| c.value().value())
    }

    /// Snapshot of every counter, sorted by name.
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        let mut values: Vec<_> = self
            .counters
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().value()))
            .collect();
        values.sort();
        values
    }
}

impl MetricsScope for InMemoryMetricsScope {
    fn counter(&self, name: &str) -> Arc<dyn Counter> {
        let counter: Arc<AtomicCounter> = self
            .counters
            .entry(name.to_string())
            .or_default()
            .value()
            .clone();
        counter
    }
}
