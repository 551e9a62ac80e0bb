//! One-shot readiness gate.
//!
//! The manifest is loaded once, in the background, and every query depends
//! on it. [`ReadyGate`] models that load as a deferred value:
//!
//! - [`ReadyGate::wait`] suspends until the load settles, then yields the
//!   value or the shared load error. Queries issued early queue here and
//!   see exactly what a query issued after the load would see.
//! - [`ReadyGate::try_get`] never waits and fails with
//!   [`CoreError::NotReady`] while the load is pending.
//!
//! The gate settles exactly once: [`GateSignal::resolve`] consumes the
//! signal, and there is no cancellation.

use crate::error::CoreError;
use align_manifest::ManifestError;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug)]
enum GateState<T> {
    Pending,
    Ready(T),
    Failed(Arc<ManifestError>),
}

impl<T: Clone> GateState<T> {
    fn outcome(&self) -> Result<T, CoreError> {
        match self {
            GateState::Pending => Err(CoreError::NotReady),
            GateState::Ready(value) => Ok(value.clone()),
            GateState::Failed(err) => Err(CoreError::Load(Arc::clone(err))),
        }
    }
}

/// Receiving side of the gate. Cheap to clone; every clone observes the
/// same single outcome.
#[derive(Debug)]
pub struct ReadyGate<T> {
    rx: watch::Receiver<GateState<T>>,
}

impl<T> Clone for ReadyGate<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

/// Sending side of the gate, held by the loader.
#[derive(Debug)]
pub struct GateSignal<T> {
    tx: watch::Sender<GateState<T>>,
}

impl<T: Clone> ReadyGate<T> {
    /// Creates an unsettled gate and the signal that settles it.
    pub fn pending() -> (GateSignal<T>, Self) {
        let (tx, rx) = watch::channel(GateState::Pending);
        (GateSignal { tx }, Self { rx })
    }

    /// Creates a gate that is already open.
    pub fn ready(value: T) -> Self {
        let (_tx, rx) = watch::channel(GateState::Ready(value));
        Self { rx }
    }

    /// Waits for the load to settle.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Load`] if the load failed
    /// - [`CoreError::Internal`] if the loader went away without settling
    pub async fn wait(&self) -> Result<T, CoreError> {
        let mut rx = self.rx.clone();
        let state = rx
            .wait_for(|state| !matches!(state, GateState::Pending))
            .await
            .map_err(|_| {
                CoreError::Internal("manifest loader exited before signalling readiness".to_string())
            })?;
        state.outcome()
    }

    /// Returns the value without waiting.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotReady`] while pending, [`CoreError::Load`] after a
    /// failed load.
    pub fn try_get(&self) -> Result<T, CoreError> {
        self.rx.borrow().outcome()
    }

    /// True once the load has succeeded.
    pub fn is_ready(&self) -> bool {
        matches!(*self.rx.borrow(), GateState::Ready(_))
    }

    /// True once the load has settled either way.
    pub fn is_settled(&self) -> bool {
        !matches!(*self.rx.borrow(), GateState::Pending)
    }
}

impl<T> GateSignal<T> {
    /// Settles the gate. Consumes the signal so it can fire only once.
    pub fn resolve(self, outcome: Result<T, ManifestError>) {
        let state = match outcome {
            Ok(value) => GateState::Ready(value),
            Err(err) => GateState::Failed(Arc::new(err)),
        };
        self.tx.send_replace(state);
    }
}
