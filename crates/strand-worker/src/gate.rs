//! Single-owner execution token for one workflow instance.
//!
//! Only one logical operation (entry point, signal, query) runs at a time.
//! The token is held for active spans and handed back at await points, so
//! signals can be processed while the entry point is suspended.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use strand_protocols::WorkflowError;

/// Token guarding the cooperative execution context.
///
/// The token is returned when an `active` span finishes, unwinds or is
/// dropped, so a panicking handler does not wedge later calls.
#[derive(Debug)]
pub struct ExecutionGate {
    semaphore: Arc<Semaphore>,
    held: Mutex<Option<Holder>>,
    next_span: AtomicU64,
}

#[derive(Debug)]
struct Holder {
    span: u64,
    _permit: OwnedSemaphorePermit,
}

/// Releases the token on behalf of one span when dropped.
struct SpanGuard<'a> {
    gate: &'a ExecutionGate,
    span: u64,
}

impl Drop for SpanGuard<'_> {
    fn drop(&mut self) {
        self.gate.release(self.span);
    }
}

impl Default for ExecutionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionGate {
    pub fn new() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
            held: Mutex::new(None),
            next_span: AtomicU64::new(0),
        }
    }

    async fn acquire(&self, span: u64) -> Result<(), WorkflowError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| WorkflowError::illegal_state("Execution gate is closed"))?;
        *self.held.lock() = Some(Holder {
            span,
            _permit: permit,
        });
        Ok(())
    }

    /// Drop the permit if `span` is the one holding it. A suspended span
    /// must not take back a token another span has since acquired.
    fn release(&self, span: u64) {
        let mut held = self.held.lock();
        if held.as_ref().is_some_and(|holder| holder.span == span) {
            held.take();
        }
    }

    /// Whether some span currently holds the token.
    pub fn is_held(&self) -> bool {
        self.held.lock().is_some()
    }

    /// Run `fut` holding the token.
    pub async fn active<T, F>(&self, fut: F) -> Result<T, WorkflowError>
    where
        F: Future<Output = Result<T, WorkflowError>>,
    {
        let span = self.next_span.fetch_add(1, Ordering::Relaxed);
        self.acquire(span).await?;
        let _guard = SpanGuard { gate: self, span };
        fut.await
    }

    /// Await `fut` with the token released, then take it back.
    ///
    /// Only valid inside an `active` span.
    pub async fn suspended<T, F>(&self, fut: F) -> Result<T, WorkflowError>
    where
        F: Future<Output = T>,
    {
        let span = self
            .held
            .lock()
            .as_ref()
            .map(|holder| holder.span)
            .ok_or_else(|| WorkflowError::illegal_state("Suspended outside an active span"))?;
        self.release(span);
        let output = fut.await;
        self.acquire(span).await?;
        Ok(output)
    }

    /// Refuse every later acquisition. Spans waiting for the token fail.
    pub fn close(&self) {
        self.semaphore.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_active_spans_are_exclusive() {
        let gate = Arc::new(ExecutionGate::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let gate = gate.clone();
            let log = log.clone();
            tokio::spawn(async move {
                gate.active(async {
                    log.lock().push("first:start");
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    log.lock().push("first:end");
                    Ok(())
                })
                .await
            })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        gate.active(async {
            log.lock().push("second");
            Ok(())
        })
        .await
        .unwrap();
        first.await.unwrap().unwrap();

        assert_eq!(
            log.lock().clone(),
            vec!["first:start", "first:end", "second"]
        );
        assert!(!gate.is_held());
    }

    #[tokio::test]
    async fn test_suspended_span_lets_others_in() {
        let gate = Arc::new(ExecutionGate::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let long = {
            let gate = gate.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let inner = gate.clone();
                gate.active(async move {
                    log.lock().push("long:start");
                    inner
                        .suspended(tokio::time::sleep(Duration::from_millis(30)))
                        .await?;
                    log.lock().push("long:end");
                    Ok(())
                })
                .await
            })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        gate.active(async {
            log.lock().push("short");
            Ok(())
        })
        .await
        .unwrap();
        long.await.unwrap().unwrap();

        assert_eq!(
            log.lock().clone(),
            vec!["long:start", "short", "long:end"]
        );
    }

    #[tokio::test]
    async fn test_panicking_span_releases_token() {
        let gate = Arc::new(ExecutionGate::new());

        let crashed = {
            let gate = gate.clone();
            tokio::spawn(async move {
                gate.active(async {
                    if true {
                        panic!("handler bug");
                    }
                    Ok(())
                })
                .await
            })
        };
        assert!(crashed.await.unwrap_err().is_panic());
        assert!(!gate.is_held());

        let next = tokio::time::timeout(Duration::from_secs(1), gate.active(async { Ok(7) }))
            .await
            .expect("gate stayed held after a panic")
            .unwrap();
        assert_eq!(next, 7);
    }

    #[tokio::test]
    async fn test_dropped_suspended_span_keeps_other_holder() {
        let gate = Arc::new(ExecutionGate::new());

        let suspended = {
            let gate = gate.clone();
            tokio::spawn(async move {
                let inner = gate.clone();
                gate.active(async move {
                    inner
                        .suspended(tokio::time::sleep(Duration::from_secs(60)))
                        .await
                })
                .await
            })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;

        let (entered_tx, entered_rx) = tokio::sync::oneshot::channel();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let holder = {
            let gate = gate.clone();
            tokio::spawn(async move {
                gate.active(async move {
                    let _ = entered_tx.send(());
                    let _ = release_rx.await;
                    Ok(())
                })
                .await
            })
        };
        entered_rx.await.unwrap();

        suspended.abort();
        assert!(suspended.await.unwrap_err().is_cancelled());
        assert!(gate.is_held());

        release_tx.send(()).unwrap();
        holder.await.unwrap().unwrap();
        assert!(!gate.is_held());
    }

    #[tokio::test]
    async fn test_suspended_outside_span_is_illegal_state() {
        let gate = ExecutionGate::new();
        let err = gate.suspended(async {}).await.unwrap_err();
        assert!(err.is_illegal_state());
    }

    #[tokio::test]
    async fn test_closed_gate_is_illegal_state() {
        let gate = ExecutionGate::new();
        gate.close();
        let err = gate.active(async { Ok(()) }).await.unwrap_err();
        assert!(err.is_illegal_state());
    }
}
