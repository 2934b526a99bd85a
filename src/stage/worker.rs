//! Stage worker: the single owner of the current story.
//!
//! Performances are run strictly one after another. Inserts are taken ahead
//! of queued performances, but never while one is running.

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{error, info, trace};
use uuid::Uuid;

use super::{PerformanceOutcome, PerformanceReport};
use crate::narrative::Story;
use crate::pipeline::{CancelHandle, Cast, Director, Editor};
use crate::plot::PlotError;

pub(crate) enum StageCommand {
    Perform {
        id: Uuid,
        ending: Story,
        animated: bool,
        cancel: CancelHandle,
        respond_to: oneshot::Sender<PerformanceReport>,
    },
    Insert {
        ending: Story,
        respond_to: oneshot::Sender<Result<Story, PlotError>>,
    },
}

pub(crate) struct StageWorker {
    pub(crate) performances: mpsc::UnboundedReceiver<StageCommand>,
    pub(crate) edits: mpsc::UnboundedReceiver<StageCommand>,
    pub(crate) cast: Cast,
    pub(crate) story: watch::Sender<Story>,
}

impl StageWorker {
    pub(crate) async fn run(mut self) {
        loop {
            let command = tokio::select! {
                biased;
                Some(command) = self.edits.recv() => command,
                Some(command) = self.performances.recv() => command,
                else => break,
            };
            self.handle(command).await;
        }
        trace!("Stage worker stopped");
    }

    async fn handle(&mut self, command: StageCommand) {
        match command {
            StageCommand::Perform {
                id,
                ending,
                animated,
                cancel,
                respond_to,
            } => {
                let report = self.perform(id, &ending, animated, &cancel).await;
                if respond_to.send(report).is_err() {
                    trace!(%id, "Stage: performance report dropped (receiver gone)");
                }
            }
            StageCommand::Insert { ending, respond_to } => {
                let result = self.insert(&ending);
                if respond_to.send(result).is_err() {
                    trace!("Stage: insert result dropped (receiver gone)");
                }
            }
        }
    }

    async fn perform(
        &mut self,
        id: Uuid,
        ending: &Story,
        animated: bool,
        cancel: &CancelHandle,
    ) -> PerformanceReport {
        // Snapshot taken now, after every earlier performance has settled.
        let beginning = self.story.borrow().clone();
        let mut director = match Director::assemble(beginning, ending, animated) {
            Ok(director) => director,
            Err(err) => {
                error!(%id, error = %err, "Cannot plot performance");
                return PerformanceReport {
                    id,
                    outcome: PerformanceOutcome::PlotFailed(err),
                    story: self.story.borrow().clone(),
                    destination: None,
                    actors: Vec::new(),
                };
            }
        };

        let story = &self.story;
        let destination = director
            .run(&self.cast, cancel, |progress| {
                story.send_replace(progress.clone());
            })
            .await;

        let outcome = if cancel.is_cancelled() {
            PerformanceOutcome::Cancelled
        } else {
            PerformanceOutcome::Completed
        };
        info!(%id, ?outcome, story = %self.story.borrow().shorthand(), "Performance settled");
        PerformanceReport {
            id,
            outcome,
            story: self.story.borrow().clone(),
            destination,
            actors: director.reports(),
        }
    }

    fn insert(&mut self, ending: &Story) -> Result<Story, PlotError> {
        let beginning = self.story.borrow().clone();
        let mut editor = Editor::assemble(beginning, ending)?;
        let reached = editor.edit(&self.cast);
        self.story.send_replace(reached.clone());
        Ok(reached)
    }
}
