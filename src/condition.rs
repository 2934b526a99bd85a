//! Guard conditions for gated scenes.
//!
//! A condition is an external stream of boolean events. A gated scene only
//! runs while its condition is `false` and unwinds itself once the condition
//! flips to `true` (e.g. "show login unless the session is authenticated").

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Event emitted by a [`Condition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionEvent {
    Next(bool),
    Error(String),
    Completed,
}

/// Source of boolean events consulted by gated scenes.
pub trait Condition: Send + Sync {
    /// Start observing. Each call returns an independent event stream.
    fn observe(&self) -> mpsc::UnboundedReceiver<ConditionEvent>;
}

/// In-memory condition backed by a shared flag.
///
/// New observers receive the current value immediately (if one is set),
/// followed by every later change.
#[derive(Clone, Default)]
pub struct ConditionFlag {
    inner: Arc<Mutex<FlagInner>>,
}

#[derive(Default)]
struct FlagInner {
    value: Option<bool>,
    finished: bool,
    observers: Vec<mpsc::UnboundedSender<ConditionEvent>>,
}

impl ConditionFlag {
    /// Create a flag holding `initial`.
    pub fn new(initial: bool) -> Self {
        let flag = Self::default();
        flag.inner.lock().value = Some(initial);
        flag
    }

    /// Create a flag that has no value yet; observers wait for the first `set`.
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<bool> {
        self.inner.lock().value
    }

    pub fn set(&self, value: bool) {
        let mut inner = self.inner.lock();
        inner.value = Some(value);
        inner.broadcast(ConditionEvent::Next(value));
    }

    /// End the stream for all observers.
    pub fn complete(&self) {
        let mut inner = self.inner.lock();
        inner.finished = true;
        inner.broadcast(ConditionEvent::Completed);
        inner.observers.clear();
    }

    /// Report a failure to all observers and end the stream.
    pub fn fail(&self, reason: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.finished = true;
        inner.broadcast(ConditionEvent::Error(reason.into()));
        inner.observers.clear();
    }
}

impl FlagInner {
    fn broadcast(&mut self, event: ConditionEvent) {
        self.observers
            .retain(|observer| observer.send(event.clone()).is_ok());
    }
}

impl Condition for ConditionFlag {
    fn observe(&self) -> mpsc::UnboundedReceiver<ConditionEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        if let Some(value) = inner.value {
            let _ = sender.send(ConditionEvent::Next(value));
        }
        if inner.finished {
            let _ = sender.send(ConditionEvent::Completed);
        } else {
            inner.observers.push(sender);
        }
        receiver
    }
}

impl fmt::Debug for ConditionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ConditionFlag")
            .field("value", &inner.value)
            .field("observers", &inner.observers.len())
            .finish()
    }
}
