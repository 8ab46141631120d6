//! Per-lookup deadline and cancellation.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::types::{LookupError, LookupResult};

/// Deadline and cancellation threaded through every fetch of one lookup.
#[derive(Debug, Clone, Default)]
pub struct LookupContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Cancels every lookup running under the paired [`LookupContext`].
/// A cancelled lookup fails exactly as one whose deadline passed.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl LookupContext {
    /// No deadline, not cancellable.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancel: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Attach a cancellation channel, returning the handle that triggers it.
    pub fn cancellable(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(rx);
        (self, CancelHandle { tx })
    }

    /// Fail if the lookup is already cancelled or past its deadline.
    pub fn check(&self) -> LookupResult<()> {
        let cancelled = self.cancel.as_ref().is_some_and(|rx| *rx.borrow());
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        if cancelled || expired {
            return Err(LookupError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `fut` to completion unless the deadline passes or the lookup is cancelled first.
    pub async fn run<F: Future>(&self, fut: F) -> LookupResult<F::Output> {
        let mut cancel = self.cancel.clone();
        tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => Err(LookupError::DeadlineExceeded),
            _ = expired(self.deadline) => Err(LookupError::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}

async fn cancelled(rx: &mut Option<watch::Receiver<bool>>) {
    let Some(rx) = rx else {
        return std::future::pending().await;
    };
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            // Handle dropped without cancelling.
            return std::future::pending().await;
        }
    }
}

async fn expired(deadline: Option<Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(d).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unbounded_context_runs() {
        let ctx = LookupContext::new();
        assert!(ctx.check().is_ok());
        assert_eq!(ctx.run(async { 7 }).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_cancel_before_run() {
        let (ctx, handle) = LookupContext::new().cancellable();
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(matches!(ctx.check(), Err(LookupError::DeadlineExceeded)));
        assert!(matches!(
            ctx.run(async { 1 }).await,
            Err(LookupError::DeadlineExceeded)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_run() {
        let (ctx, handle) = LookupContext::new().cancellable();
        let slow = tokio::time::sleep(Duration::from_secs(60));
        let cancel = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.cancel();
        };
        let (result, ()) = tokio::join!(ctx.run(slow), cancel);
        assert!(matches!(result, Err(LookupError::DeadlineExceeded)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_never_cancels() {
        let (ctx, handle) = LookupContext::new().cancellable();
        drop(handle);
        let out = ctx
            .run(async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                3
            })
            .await;
        assert_eq!(out.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_passed() {
        let ctx = LookupContext::with_timeout(Duration::from_secs(1));
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(matches!(ctx.check(), Err(LookupError::DeadlineExceeded)));
    }
}
