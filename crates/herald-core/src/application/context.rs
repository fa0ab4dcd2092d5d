//! Per-request context: correlation id and cancellation

use crate::application::{ApplicationError, ApplicationResult};
use herald_domain::DomainResult;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// Create a connected cancellation handle and signal
pub fn cancellation_pair() -> (CancellationHandle, CancellationSignal) {
    let (tx, rx) = watch::channel(false);
    (
        CancellationHandle { tx: Arc::new(tx) },
        CancellationSignal { rx },
    )
}

/// Caller side of a cancellation pair
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancellationHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Pipeline side of a cancellation pair
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    rx: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested; pends forever if the
    /// handle is dropped without cancelling
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Context travelling with one dispatch
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    cancellation: CancellationSignal,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            cancellation: CancellationSignal::never(),
        }
    }

    /// Use a caller-supplied correlation id
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_cancellation(mut self, signal: CancellationSignal) -> Self {
        self.cancellation = signal;
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn cancellation(&self) -> &CancellationSignal {
        &self.cancellation
    }

    /// Run a port operation unless the request is cancelled first
    ///
    /// Cancellation wins ties, so an already-cancelled request never starts
    /// the operation.
    pub async fn guard<T, F>(&self, operation: F) -> ApplicationResult<T>
    where
        F: Future<Output = DomainResult<T>> + Send,
    {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(ApplicationError::Cancelled),
            result = operation => result.map_err(ApplicationError::from),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_domain::DomainError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_guard_passes_result_through() {
        let ctx = RequestContext::new();

        let ok = ctx.guard(async { Ok::<_, DomainError>(7) }).await;
        assert_eq!(ok, Ok(7));

        let err = ctx
            .guard(async { Err::<u8, _>(DomainError::NotFound("Event x".into())) })
            .await;
        assert_eq!(err, Err(ApplicationError::NotFound("Event x".into())));
    }

    #[tokio::test]
    async fn test_guard_skips_operation_when_already_cancelled() {
        let (handle, signal) = cancellation_pair();
        let ctx = RequestContext::new().with_cancellation(signal);
        handle.cancel();

        let started = AtomicBool::new(false);
        let result = ctx
            .guard(async {
                started.store(true, Ordering::SeqCst);
                Ok::<_, DomainError>(())
            })
            .await;

        assert_eq!(result, Err(ApplicationError::Cancelled));
        assert!(!started.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_interrupts_slow_operation() {
        let (handle, signal) = cancellation_pair();
        let ctx = RequestContext::new().with_cancellation(signal);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.cancel();
        });

        let result = ctx
            .guard(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, DomainError>(())
            })
            .await;

        assert_eq!(result, Err(ApplicationError::Cancelled));
    }

    #[test]
    fn test_never_signal() {
        let signal = CancellationSignal::never();
        assert!(!signal.is_cancelled());
        assert!(!RequestContext::default().is_cancelled());
    }

    #[test]
    fn test_handle_reports_state() {
        let (handle, signal) = cancellation_pair();
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(signal.is_cancelled());
    }
}
