//! Manual compensation for multi-step write sequences.
//!
//! The custody flows write to several tables without a wrapping
//! transaction, so a failure partway through must undo the steps that
//! already succeeded. Each step registers its undo right after it
//! commits; on failure the undos run in reverse order.

use std::future::Future;
use std::pin::Pin;

use tracing::warn;

use toolrack_core::AppResult;

type UndoFuture = Pin<Box<dyn Future<Output = AppResult<()>> + Send>>;
type UndoFn = Box<dyn FnOnce() -> UndoFuture + Send>;

/// Accumulates undo actions for an in-flight multi-write operation.
///
/// A failed undo is logged and skipped so the remaining undos still run;
/// the operation's original error is what the caller reports.
#[derive(Default)]
pub struct Saga {
    undos: Vec<(&'static str, UndoFn)>,
}

impl Saga {
    /// Start an empty saga.
    pub fn new() -> Self {
        Self { undos: Vec::new() }
    }

    /// Register the undo for a step that just succeeded.
    pub fn push_undo<F, Fut>(&mut self, step: &'static str, undo: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        self.undos.push((step, Box::new(move || Box::pin(undo()))));
    }

    /// Number of undo actions currently registered.
    pub fn len(&self) -> usize {
        self.undos.len()
    }

    /// Whether no undo actions are registered.
    pub fn is_empty(&self) -> bool {
        self.undos.is_empty()
    }

    /// Run every registered undo, newest first.
    pub async fn compensate(mut self) {
        while let Some((step, undo)) = self.undos.pop() {
            if let Err(err) = undo().await {
                warn!(step, error = %err, "compensation step failed; continuing");
            }
        }
    }

    /// Discard the undos without running them; the operation committed.
    pub fn commit(mut self) {
        self.undos.clear();
    }
}
