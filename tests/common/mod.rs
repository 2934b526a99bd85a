//! Shared test utilities: a recording executor and a name-based resolver.

#![allow(dead_code, unused_imports)]

use parking_lot::Mutex;
use stagecraft::{
    Cast, Completion, Narratable, ResolutionError, ScreenDescriptor, ScreenHandle, ScreenResolver,
    Script, TransitionCatalog, TransitionExecutor, TransitionOperator, TransitionRequest,
};
use std::sync::Arc;
use std::time::Duration;

/// One transition seen by the [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operator: TransitionOperator,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub animated: bool,
}

/// Executor that records every transition and completes it, either
/// immediately or after a delay on a spawned task.
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    delay: Option<Duration>,
    /// Operator whose transitions report landing on the named screen.
    landing: Option<(TransitionOperator, String)>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn delayed(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    /// Completes `operator` transitions with `finish_at` on `screen`.
    pub fn landing(operator: TransitionOperator, screen: &str) -> Arc<Self> {
        Arc::new(Self {
            landing: Some((operator, screen.to_string())),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn operators(&self) -> Vec<TransitionOperator> {
        self.calls.lock().iter().map(|call| call.operator).collect()
    }

    /// `"op destination"` for every call.
    pub fn log(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|call| {
                format!(
                    "{} {}",
                    call.operator,
                    call.destination.as_deref().unwrap_or("-")
                )
            })
            .collect()
    }
}

impl TransitionExecutor for Recorder {
    fn execute(&self, request: TransitionRequest, completion: Completion) {
        self.calls.lock().push(Call {
            operator: request.operator,
            source: name_of(&request.source),
            destination: name_of(&request.destination),
            animated: request.animated,
        });
        if let Some((operator, screen)) = &self.landing {
            if *operator == request.operator {
                completion.finish_at(true, ScreenHandle::new(screen.clone()));
                return;
            }
        }
        match self.delay {
            Some(delay) => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    completion.finish(true);
                });
            }
            None => completion.finish(true),
        }
    }
}

/// Resolves descriptors to handles wrapping their name; "missing" fails.
pub struct ByName;

impl ScreenResolver for ByName {
    fn resolve(&self, descriptor: &ScreenDescriptor) -> Result<ScreenHandle, ResolutionError> {
        if descriptor.name() == "missing" {
            return Err(ResolutionError::new(descriptor, "no such screen"));
        }
        Ok(ScreenHandle::new(descriptor.name().to_string()))
    }
}

pub fn name_of(handle: &Option<ScreenHandle>) -> Option<String> {
    handle
        .as_ref()
        .and_then(|h| h.downcast_ref::<String>())
        .cloned()
}

pub fn cast(recorder: &Arc<Recorder>) -> Cast {
    Cast::new(TransitionCatalog::new(recorder.clone()), Arc::new(ByName))
}

pub fn screen(name: &str) -> ScreenDescriptor {
    ScreenDescriptor::new("Screen", name)
}

/// `/main/categories/{category}` where the category matches `\w+`.
pub fn category_script() -> Script {
    Script::named("category")
        .root(screen("main"))
        .push(screen("categories"))
        .push_capture(r"\w+", "category", |input| {
            screen(input).with_identity(format!("category/{input}"))
        })
        .expect("valid pattern")
}
