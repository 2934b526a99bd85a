//! The stage: current navigation state, registered scripts and the
//! serialized performance queue.
//!
//! ```text
//!   Stage::perform ──► performances ─┐
//!                                    ├─► StageWorker ──► Director / Editor ──► executors
//!   Stage::insert  ──► edits ────────┘        │
//!                                             └─► watch<Story> ──► Stage::story / subscribe
//! ```

mod registry;
mod worker;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

use crate::config::StageConfig;
use crate::narrative::{Script, Story};
use crate::pipeline::{ActorReport, CancelHandle, Cast};
use crate::plot::PlotError;
use crate::router::{RouteError, Router};
use crate::screen::ScreenHandle;

pub use registry::ScriptRegistry;
use worker::{StageCommand, StageWorker};

#[derive(Debug, Error)]
pub enum StageError {
    #[error("Stage worker is no longer running")]
    WorkerGone,

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// How a performance ended.
#[derive(Debug)]
pub enum PerformanceOutcome {
    /// Every actor ran (individual actors may still have failed or been skipped).
    Completed,
    /// Cancelled; actors that had not finished were skipped.
    Cancelled,
    /// No route from the current story to the requested one; nothing ran.
    PlotFailed(PlotError),
}

/// Result of a settled performance.
#[derive(Debug)]
pub struct PerformanceReport {
    pub id: Uuid,
    pub outcome: PerformanceOutcome,
    /// Current story once the performance settled.
    pub story: Story,
    /// Screen the last actor ended on.
    pub destination: Option<ScreenHandle>,
    pub actors: Vec<ActorReport>,
}

/// Handle to a submitted performance.
#[derive(Debug)]
pub struct Performance {
    id: Uuid,
    cancel: CancelHandle,
    report: oneshot::Receiver<PerformanceReport>,
}

impl Performance {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Cancel every actor that has not finished. Transitions already
    /// performed are not rolled back.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Wait for the performance to settle.
    pub async fn finished(self) -> Result<PerformanceReport, StageError> {
        self.report.await.map_err(|_| StageError::WorkerGone)
    }
}

/// Navigation stage.
///
/// Cloning shares the same worker, current story and registry. The worker
/// stops once every clone is dropped.
#[derive(Clone)]
pub struct Stage {
    performances: mpsc::UnboundedSender<StageCommand>,
    edits: mpsc::UnboundedSender<StageCommand>,
    story: watch::Receiver<Story>,
    registry: ScriptRegistry,
    config: StageConfig,
}

impl Stage {
    /// Start a stage on the current tokio runtime.
    pub fn new(cast: Cast, config: StageConfig) -> Self {
        Self::with_registry(cast, config, ScriptRegistry::new())
    }

    /// Start a stage sharing an existing script registry.
    pub fn with_registry(cast: Cast, config: StageConfig, registry: ScriptRegistry) -> Self {
        let (performance_tx, performance_rx) = mpsc::unbounded_channel();
        let (edit_tx, edit_rx) = mpsc::unbounded_channel();
        let (story_tx, story_rx) = watch::channel(Story::new());

        let worker = StageWorker {
            performances: performance_rx,
            edits: edit_rx,
            cast,
            story: story_tx,
        };
        tokio::spawn(worker.run());

        Self {
            performances: performance_tx,
            edits: edit_tx,
            story: story_rx,
            registry,
            config,
        }
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    pub fn register(&self, script: Script) {
        self.registry.register(script);
    }

    pub fn registered_scripts(&self) -> Vec<Script> {
        self.registry.scripts()
    }

    /// Current absolute story.
    pub fn story(&self) -> Story {
        self.story.borrow().clone()
    }

    /// Observe the current story; updated after every actor.
    pub fn subscribe(&self) -> watch::Receiver<Story> {
        self.story.clone()
    }

    /// Queue a performance towards `story`, animated per the stage config.
    pub fn perform(&self, story: Story) -> Performance {
        self.perform_animated(story, self.config.animated)
    }

    pub fn perform_animated(&self, story: Story, animated: bool) -> Performance {
        let id = Uuid::new_v4();
        let cancel = CancelHandle::new();
        let (respond_to, report) = oneshot::channel();
        let command = StageCommand::Perform {
            id,
            ending: story,
            animated,
            cancel: cancel.clone(),
            respond_to,
        };
        if self.performances.send(command).is_err() {
            tracing::warn!(%id, "Stage worker gone, performance dropped");
        }
        Performance { id, cancel, report }
    }

    /// Rewrite the current story without animation, ahead of any queued
    /// performances. Returns the new current story.
    ///
    /// Never runs alongside a performance: while one is running, including
    /// a gated scene waiting on its condition, the insert waits for it to
    /// settle.
    pub async fn insert(&self, story: Story) -> Result<Story, StageError> {
        let (respond_to, result) = oneshot::channel();
        self.edits
            .send(StageCommand::Insert {
                ending: story,
                respond_to,
            })
            .map_err(|_| StageError::WorkerGone)?;
        Ok(result.await.map_err(|_| StageError::WorkerGone)??)
    }

    pub fn router(&self) -> Router {
        Router::new(self.registry.clone()).strict(self.config.strict_routes)
    }

    /// Story for the registered script routing `segments`, if any.
    pub fn story_matching<S: AsRef<str>>(&self, segments: &[S]) -> Result<Option<Story>, RouteError> {
        self.router().route(segments)
    }

    /// Route `path` and perform the matching story.
    pub fn perform_path(&self, path: &str) -> Result<Option<Performance>, StageError> {
        Ok(self
            .router()
            .route_path(path)?
            .map(|story| self.perform(story)))
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("story", &self.story.borrow().shorthand())
            .field("scripts", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}
