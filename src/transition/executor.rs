//! Transition executor seam and the catalog binding operators to executors.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;

use super::operator::TransitionOperator;
use crate::screen::ScreenHandle;

/// A single transition to perform between two screens.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub operator: TransitionOperator,
    pub source: Option<ScreenHandle>,
    pub destination: Option<ScreenHandle>,
    pub animated: bool,
}

/// What the executor reports back once a transition settles.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub completed: bool,
    /// Screen the transition actually landed on, when it differs from the
    /// requested destination (e.g. the new top of a stack after a pop).
    pub landed_on: Option<ScreenHandle>,
}

impl TransitionOutcome {
    fn incomplete() -> Self {
        Self {
            completed: false,
            landed_on: None,
        }
    }
}

/// One-shot completion signal handed to a [`TransitionExecutor`].
///
/// Finishing consumes the handle, so a transition can only be signalled once.
/// Dropping it without finishing counts as an incomplete transition rather
/// than leaving the pipeline waiting.
pub struct Completion {
    sender: Option<oneshot::Sender<TransitionOutcome>>,
}

impl Completion {
    pub(crate) fn channel() -> (Self, CompletionSignal) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender: Some(sender),
            },
            CompletionSignal { receiver },
        )
    }

    /// Signal the transition finished.
    pub fn finish(mut self, completed: bool) {
        self.send(TransitionOutcome {
            completed,
            landed_on: None,
        });
    }

    /// Signal the transition finished on a different screen than requested.
    pub fn finish_at(mut self, completed: bool, landed_on: ScreenHandle) {
        self.send(TransitionOutcome {
            completed,
            landed_on: Some(landed_on),
        });
    }

    fn send(&mut self, outcome: TransitionOutcome) {
        if let Some(sender) = self.sender.take() {
            // The receiver is gone for inline edits; nothing is waiting.
            let _ = sender.send(outcome);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.sender.is_some() {
            tracing::warn!("Transition completion dropped without a signal, treating as incomplete");
            self.send(TransitionOutcome::incomplete());
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.sender.is_some())
            .finish()
    }
}

/// Receiving side of a [`Completion`].
pub(crate) struct CompletionSignal {
    receiver: oneshot::Receiver<TransitionOutcome>,
}

impl CompletionSignal {
    pub(crate) async fn wait(self) -> TransitionOutcome {
        self.receiver
            .await
            .unwrap_or_else(|_| TransitionOutcome::incomplete())
    }
}

/// Performs a named transition between two opaque screens.
///
/// Implementations must eventually call exactly one of
/// [`Completion::finish`] or [`Completion::finish_at`]; they may do so from
/// any thread, before or after `execute` returns.
pub trait TransitionExecutor: Send + Sync {
    fn execute(&self, request: TransitionRequest, completion: Completion);
}

/// Binds operators to the executors that perform them.
///
/// Operators without an explicit binding go to the fallback executor.
/// [`TransitionOperator::None`] never reaches an executor.
#[derive(Clone)]
pub struct TransitionCatalog {
    fallback: Arc<dyn TransitionExecutor>,
    bound: HashMap<TransitionOperator, Arc<dyn TransitionExecutor>>,
}

impl TransitionCatalog {
    pub fn new(fallback: Arc<dyn TransitionExecutor>) -> Self {
        Self {
            fallback,
            bound: HashMap::new(),
        }
    }

    /// Route one operator to a dedicated executor.
    pub fn bind(mut self, operator: TransitionOperator, executor: Arc<dyn TransitionExecutor>) -> Self {
        self.bound.insert(operator, executor);
        self
    }

    pub fn executor_for(&self, operator: TransitionOperator) -> &Arc<dyn TransitionExecutor> {
        self.bound.get(&operator).unwrap_or(&self.fallback)
    }
}

impl fmt::Debug for TransitionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<_> = self.bound.keys().map(|op| op.name()).collect();
        bound.sort_unstable();
        f.debug_struct("TransitionCatalog")
            .field("bound", &bound)
            .finish_non_exhaustive()
    }
}
