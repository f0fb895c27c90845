//! Metrics sink contract.

use std::sync::Arc;

/// A monotonically increasing counter.
pub trait Counter: Send + Sync {
    fn inc(&self, delta: u64);
}

/// Source of named counters.
pub trait MetricsScope: Send + Sync {
    fn counter(&self, name: &str) -> Arc<dyn Counter>;
}

/// Scope that discards every measurement.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetricsScope;

struct NoopCounter;

impl Counter for NoopCounter {
    fn inc(&self, _delta: u64) {}
}

impl MetricsScope for NoopMetricsScope {
    fn counter(&self, _name: &str) -> Arc<dyn Counter> {
        Arc::new(NoopCounter)
    }
}
