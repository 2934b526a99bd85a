//! Actors: one asynchronous execution unit per scene.

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, warn};

use super::cancel::CancelHandle;
use super::Cast;
use crate::condition::ConditionEvent;
use crate::narrative::Scene;
use crate::screen::ScreenHandle;
use crate::transition::{Completion, TransitionOperator, TransitionRequest};

/// Actor lifecycle: `Waiting → Executing → Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    Waiting,
    Executing,
    Finished,
}

/// How an actor finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorOutcome {
    /// The transition completed (for gated actors: shown and unwound again).
    Completed,
    /// The executor reported the transition as not completed.
    Incomplete,
    /// Gated actor whose condition already held, or never produced a value.
    Skipped,
    /// Cancelled before or while executing; no further transitions ran.
    Cancelled,
    /// A screen could not be resolved.
    Failed,
}

/// Summary of one finished actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorReport {
    pub scene: String,
    pub outcome: ActorOutcome,
    /// Number of transitions handed to an executor (inline `none` included).
    pub transitions: usize,
}

pub(crate) struct Actor {
    scene: Scene,
    animated: bool,
    state: ActorState,
    condition: Option<mpsc::UnboundedReceiver<ConditionEvent>>,
    transitions: usize,
    destination: Option<ScreenHandle>,
    outcome: Option<ActorOutcome>,
    advanced: bool,
}

/// What happened to a gated actor's condition while it was waiting.
enum Gate {
    Holds,
    Open,
    Closed,
    Cancelled,
}

/// Newest known state of a condition stream.
#[derive(Default)]
struct Observed {
    value: Option<bool>,
    closed: bool,
}

impl Observed {
    fn record(&mut self, scene: &Scene, event: Option<ConditionEvent>) {
        match event {
            Some(ConditionEvent::Next(value)) => self.value = Some(value),
            Some(ConditionEvent::Error(reason)) => {
                warn!(scene = %scene, %reason, "Condition failed");
                self.closed = true;
            }
            Some(ConditionEvent::Completed) | None => self.closed = true,
        }
    }

    /// Take every event already queued so decisions use the latest value.
    fn drain(&mut self, scene: &Scene, events: &mut mpsc::UnboundedReceiver<ConditionEvent>) {
        while !self.closed {
            match events.try_recv() {
                Ok(event) => self.record(scene, Some(event)),
                Err(TryRecvError::Disconnected) => self.record(scene, None),
                Err(TryRecvError::Empty) => break,
            }
        }
    }
}

impl Actor {
    pub(crate) fn new(scene: Scene, animated: bool) -> Self {
        let condition = scene.condition().map(|condition| condition.observe());
        Self {
            scene,
            animated,
            state: ActorState::Waiting,
            condition,
            transitions: 0,
            destination: None,
            outcome: None,
            advanced: false,
        }
    }

    pub(crate) fn scene(&self) -> &Scene {
        &self.scene
    }

    pub(crate) fn state(&self) -> ActorState {
        self.state
    }

    pub(crate) fn is_gated(&self) -> bool {
        self.condition.is_some()
    }

    /// Whether the stage ended up on this actor's destination.
    pub(crate) fn advanced(&self) -> bool {
        self.advanced
    }

    /// Screen the next actor should use as its source.
    pub(crate) fn destination(&self) -> Option<&ScreenHandle> {
        self.destination.as_ref()
    }

    pub(crate) fn report(&self) -> ActorReport {
        ActorReport {
            scene: self.scene.shorthand(),
            outcome: self.outcome.unwrap_or(ActorOutcome::Cancelled),
            transitions: self.transitions,
        }
    }

    /// Run this actor to completion.
    ///
    /// `source` is the screen the previous actor ended on; an explicit
    /// source on the scene wins over it.
    pub(crate) async fn perform(
        &mut self,
        cast: &Cast,
        source: Option<ScreenHandle>,
        cancel: &CancelHandle,
    ) -> ActorOutcome {
        if cancel.is_cancelled() {
            return self.finish(ActorOutcome::Cancelled);
        }

        if self.is_gated() {
            match self.gate(cancel, false).await {
                Gate::Open => {}
                Gate::Holds => {
                    debug!(scene = %self.scene, "Condition already met, skipping");
                    self.destination = source;
                    return self.finish(ActorOutcome::Skipped);
                }
                Gate::Closed => {
                    self.destination = source;
                    return self.finish(ActorOutcome::Skipped);
                }
                Gate::Cancelled => return self.finish(ActorOutcome::Cancelled),
            }
        }

        self.state = ActorState::Executing;
        debug!(scene = %self.scene, "Actor executing");

        let Some((source, destination)) = self.resolve(cast, source.clone()) else {
            self.destination = source;
            return self.finish(ActorOutcome::Failed);
        };

        let request = TransitionRequest {
            operator: self.scene.operator(),
            source: source.clone(),
            destination,
            animated: self.animated,
        };
        let (completed, landed_on) = self.transition(cast, request).await;
        self.destination = landed_on;
        if !completed {
            return self.finish(ActorOutcome::Incomplete);
        }
        self.advanced = true;

        if self.is_gated() {
            match self.gate(cancel, true).await {
                Gate::Holds | Gate::Open => {}
                Gate::Closed => return self.finish(ActorOutcome::Completed),
                Gate::Cancelled => return self.finish(ActorOutcome::Cancelled),
            }
            debug!(scene = %self.scene, "Condition met, unwinding");
            let request = TransitionRequest {
                operator: self.scene.operator().inverse(),
                source: source.clone(),
                destination: self.destination.clone(),
                animated: self.animated,
            };
            let (completed, _) = self.transition(cast, request).await;
            if !completed {
                return self.finish(ActorOutcome::Incomplete);
            }
            self.destination = source;
            self.advanced = false;
        }

        self.finish(ActorOutcome::Completed)
    }

    /// Run this actor inline as a structural edit: not animated, gates
    /// ignored, and the executor's completion is not awaited.
    pub(crate) fn perform_inline(&mut self, cast: &Cast, source: Option<ScreenHandle>) -> ActorOutcome {
        self.state = ActorState::Executing;
        let Some((source, destination)) = self.resolve(cast, source.clone()) else {
            self.destination = source;
            return self.finish(ActorOutcome::Failed);
        };

        let operator = self.scene.operator();
        self.transitions += 1;
        if operator == TransitionOperator::None {
            self.destination = source;
        } else {
            let (completion, _signal) = Completion::channel();
            self.destination = destination.clone();
            let request = TransitionRequest {
                operator,
                source,
                destination,
                animated: false,
            };
            cast.catalog.executor_for(operator).execute(request, completion);
        }
        self.advanced = true;
        self.finish(ActorOutcome::Completed)
    }

    /// Resolve `(source, destination)` for this scene.
    fn resolve(
        &self,
        cast: &Cast,
        dynamic_source: Option<ScreenHandle>,
    ) -> Option<(Option<ScreenHandle>, Option<ScreenHandle>)> {
        let resolver = cast.resolver.as_ref();
        let resolved = self.scene.resolve_source(resolver).and_then(|source| {
            let destination = self.scene.resolve_destination(resolver)?;
            Ok((source.or(dynamic_source), destination))
        });
        match resolved {
            Ok(pair) => Some(pair),
            Err(err) => {
                warn!(scene = %self.scene, error = %err, "Failed to resolve scene, skipping transition");
                None
            }
        }
    }

    /// Hand one transition to its executor and wait for it to settle.
    ///
    /// `none` is performed inline: the destination becomes the source.
    /// In-flight transitions are never interrupted by cancellation.
    async fn transition(&mut self, cast: &Cast, request: TransitionRequest) -> (bool, Option<ScreenHandle>) {
        self.transitions += 1;
        if request.operator == TransitionOperator::None {
            return (true, request.source);
        }

        let requested = request.destination.clone();
        let (completion, signal) = Completion::channel();
        cast.catalog
            .executor_for(request.operator)
            .execute(request, completion);
        let outcome = signal.wait().await;
        (outcome.completed, outcome.landed_on.or(requested))
    }

    /// Wait on the condition until it reads `want`, deciding on the latest
    /// value rather than the oldest queued one.
    ///
    /// With `want == false` the first known value decides: `true` means the
    /// condition already holds.
    async fn gate(&mut self, cancel: &CancelHandle, want: bool) -> Gate {
        let Some(events) = self.condition.as_mut() else {
            return Gate::Open;
        };
        let scene = &self.scene;
        let mut observed = Observed::default();
        loop {
            observed.drain(scene, events);
            match observed.value {
                Some(value) if !want => return if value { Gate::Holds } else { Gate::Open },
                Some(true) => return Gate::Open,
                _ => {}
            }
            if observed.closed {
                return Gate::Closed;
            }
            let event = tokio::select! {
                _ = cancel.cancelled() => return Gate::Cancelled,
                event = events.recv() => event,
            };
            observed.record(scene, event);
        }
    }

    fn finish(&mut self, outcome: ActorOutcome) -> ActorOutcome {
        self.state = ActorState::Finished;
        self.outcome = Some(outcome);
        debug!(scene = %self.scene, ?outcome, transitions = self.transitions, "Actor finished");
        outcome
    }
}
