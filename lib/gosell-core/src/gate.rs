//! SDK initialization gate.
//!
//! Authenticated requests wait until the SDK reports it is initialized. The
//! state is owned by the initialization subsystem; the client only awaits
//! [`InitializationGate::check_initialization_status`].

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::Error;

/// Lifecycle of SDK initialization.
#[derive(Debug, Clone, Default)]
pub enum InitializationState {
    /// Nothing started yet.
    #[default]
    Uninitialized,
    /// Initialization is in flight.
    Initializing,
    /// Requests may proceed.
    Ready,
    /// Initialization failed with the given error.
    Failed(Error),
}

impl InitializationState {
    /// Returns `true` once the state is `Ready` or `Failed`.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed(_))
    }

    fn outcome(&self) -> Option<Result<(), Error>> {
        match self {
            Self::Ready => Some(Ok(())),
            Self::Failed(error) => Some(Err(error.clone())),
            Self::Uninitialized | Self::Initializing => None,
        }
    }
}

/// Readiness check that precedes authenticated requests.
pub trait InitializationGate: Send + Sync + 'static {
    /// Resolve once initialization settled: `Ok(())` when ready, the
    /// initialization error when it failed.
    ///
    /// If the state is already settled the future completes on its first poll.
    fn check_initialization_status(&self) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Gate that never blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReady;

impl InitializationGate for AlwaysReady {
    fn check_initialization_status(&self) -> impl Future<Output = Result<(), Error>> + Send {
        std::future::ready(Ok(()))
    }
}

/// Shared initialization state, driven by the initialization subsystem.
///
/// Clones observe and drive the same state.
#[derive(Debug, Clone)]
pub struct InitializationStatus {
    sender: Arc<watch::Sender<InitializationState>>,
}

impl Default for InitializationStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl InitializationStatus {
    /// New status in the `Uninitialized` state.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(InitializationState::Uninitialized);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> InitializationState {
        self.sender.borrow().clone()
    }

    /// Mark initialization as started.
    pub fn set_initializing(&self) {
        self.transition(InitializationState::Initializing);
    }

    /// Mark initialization as succeeded; waiting requests proceed.
    pub fn set_ready(&self) {
        self.transition(InitializationState::Ready);
    }

    /// Mark initialization as failed; waiting requests fail with `error`.
    pub fn set_failed(&self, error: Error) {
        self.transition(InitializationState::Failed(error));
    }

    /// Go back to `Uninitialized`, e.g. after the session ended.
    pub fn reset(&self) {
        self.transition(InitializationState::Uninitialized);
    }

    fn transition(&self, state: InitializationState) {
        debug!(?state, "initialization state changed");
        self.sender.send_replace(state);
    }
}

impl InitializationGate for InitializationStatus {
    fn check_initialization_status(&self) -> impl Future<Output = Result<(), Error>> + Send {
        let mut receiver = self.sender.subscribe();
        async move {
            let outcome = receiver
                .wait_for(InitializationState::is_settled)
                .await
                .ok()
                .and_then(|state| state.outcome());

            // The sender lives as long as any handle; losing it means nobody
            // can ever settle the state.
            outcome.unwrap_or_else(|| Err(Error::unknown(None)))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert2::{check, let_assert};

    use super::*;
    use crate::{ErrorKind, TransportError};

    #[tokio::test]
    async fn always_ready_passes() {
        check!(AlwaysReady.check_initialization_status().await.is_ok());
    }

    #[tokio::test]
    async fn ready_state_passes_immediately() {
        let status = InitializationStatus::new();
        status.set_ready();

        check!(status.check_initialization_status().await.is_ok());
    }

    #[tokio::test]
    async fn failed_state_reports_error() {
        let status = InitializationStatus::new();
        status.set_failed(Error::network(TransportError::Timeout, None));

        let_assert!(Err(error) = status.check_initialization_status().await);
        check!(error.is_timeout());
        check!(matches!(status.state(), InitializationState::Failed(_)));
    }

    #[tokio::test]
    async fn waits_until_settled() {
        let status = InitializationStatus::new();
        status.set_initializing();

        let check = tokio::spawn({
            let status = status.clone();
            async move { status.check_initialization_status().await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        check!(!check.is_finished());

        status.set_ready();
        let_assert!(Ok(Ok(())) = check.await);
    }

    #[tokio::test]
    async fn waiting_check_sees_failure() {
        let status = InitializationStatus::new();

        let check = tokio::spawn({
            let status = status.clone();
            async move { status.check_initialization_status().await }
        });
        tokio::task::yield_now().await;

        status.set_failed(Error::unknown(None));
        let_assert!(Ok(Err(error)) = check.await);
        check!(error.kind() == ErrorKind::Unknown);
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let status = InitializationStatus::new();
        status.set_ready();
        status.reset();
        check!(matches!(status.state(), InitializationState::Uninitialized));
        check!(!status.state().is_settled());
    }
}
