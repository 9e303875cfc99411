//! Per-call context carrying cancellation and an optional deadline.
//!
//! Every suspension point of a call (send, body read, login, backoff sleep)
//! is raced against the context so a cancelled or expired call returns
//! promptly instead of continuing its retry loop.

use crate::PlatformError;
use std::{future::Future, time::Duration};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline scope for one or more API calls.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline_at(Instant::now() + timeout)
    }

    /// Set an absolute deadline, keeping the earlier one if already set.
    #[must_use]
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |d| d.min(deadline)));
        self
    }

    /// Derive a context cancelled together with this one, with its own
    /// (possibly tighter) deadline.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel this context and every child derived from it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The token observed by this context.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail fast if the context is already done.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Cancelled`] or [`PlatformError::DeadlineExceeded`].
    pub fn check(&self) -> Result<(), PlatformError> {
        if self.cancel.is_cancelled() {
            return Err(PlatformError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(PlatformError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` to completion unless the context ends first.
    ///
    /// # Errors
    ///
    /// Returns a context error if cancellation or the deadline wins the race;
    /// `fut` is dropped in that case.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, PlatformError> {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(PlatformError::Cancelled),
            () = deadline => Err(PlatformError::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }

    /// Sleep for `duration` unless the context ends first.
    ///
    /// # Errors
    ///
    /// Returns a context error if the sleep is interrupted.
    pub async fn sleep(&self, duration: Duration) -> Result<(), PlatformError> {
        self.run(tokio::time::sleep(duration)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes() {
        let ctx = CallContext::new();
        let out = ctx.run(async { 7 }).await;
        assert_eq!(out.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let ctx = CallContext::new();
        ctx.cancel();
        let out = ctx.run(async { 7 }).await;
        assert!(matches!(out, Err(PlatformError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_interrupts_sleep() {
        let ctx = CallContext::with_timeout(Duration::from_millis(50));
        let started = Instant::now();
        let out = ctx.sleep(Duration::from_secs(60)).await;
        assert!(matches!(out, Err(PlatformError::DeadlineExceeded)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_sleep() {
        let ctx = CallContext::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });
        let out = ctx.sleep(Duration::from_secs(60)).await;
        assert!(matches!(out, Err(PlatformError::Cancelled)));
    }

    #[tokio::test]
    async fn test_child_follows_parent() {
        let parent = CallContext::new();
        let child = parent.child();
        parent.cancel();
        assert!(matches!(child.check(), Err(PlatformError::Cancelled)));
    }

    #[test]
    fn test_deadline_keeps_earliest() {
        let now = Instant::now();
        let ctx = CallContext::new()
            .deadline_at(now + Duration::from_secs(5))
            .deadline_at(now + Duration::from_secs(10));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_run_on_plain_runtime() {
        let ctx = CallContext::new();
        let out = tokio_test::block_on(ctx.run(async { "done" }));
        assert_eq!(tokio_test::assert_ok!(out), "done");
    }
}
