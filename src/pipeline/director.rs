//! Director: builds and runs the actor chain for one plotted story.

use tracing::{info, warn};

use super::actor::{Actor, ActorReport, ActorState};
use super::cancel::CancelHandle;
use super::Cast;
use crate::narrative::Story;
use crate::plot::{plot, relative, PlotError};
use crate::screen::ScreenHandle;

/// Linear chain of actors taking the stage from `beginning` to an ending story.
///
/// Each actor starts only once the previous one has finished and uses the
/// screen it ended on as its source.
pub struct Director {
    pub(super) beginning: Story,
    pub(super) plotted: Story,
    pub(super) actors: Vec<Actor>,
}

impl Director {
    /// Plot from `beginning` to `ending` and cast one actor per plotted scene.
    pub fn assemble(beginning: Story, ending: &Story, animated: bool) -> Result<Self, PlotError> {
        let plotted = plot(&beginning, ending)?;
        let actors = plotted
            .scenes()
            .iter()
            .cloned()
            .map(|scene| Actor::new(scene, animated))
            .collect();
        Ok(Self {
            beginning,
            plotted,
            actors,
        })
    }

    /// The delta this director performs.
    pub fn plotted(&self) -> &Story {
        &self.plotted
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn reports(&self) -> Vec<ActorReport> {
        self.actors.iter().map(Actor::report).collect()
    }

    /// Run every actor in order.
    ///
    /// `on_progress` receives the absolute story reached so far after each
    /// actor finishes. Returns the screen the last actor ended on.
    pub async fn run(
        &mut self,
        cast: &Cast,
        cancel: &CancelHandle,
        mut on_progress: impl FnMut(&Story),
    ) -> Option<ScreenHandle> {
        info!(
            from = %self.beginning.shorthand(),
            delta = %self.plotted.shorthand(),
            actors = self.actors.len(),
            "Performance starting"
        );
        let mut progress = Progress::new(&self.beginning, &self.plotted);
        let mut source = self.opening_screen(cast);

        for actor in &mut self.actors {
            if actor.state() == ActorState::Finished {
                continue;
            }
            actor.perform(cast, source.clone(), cancel).await;
            source = actor.destination().cloned();
            on_progress(&progress.record(actor));
        }

        info!(cancelled = cancel.is_cancelled(), "Performance finished");
        source
    }

    /// Screen the first actor starts from: where the beginning story ends.
    pub(super) fn opening_screen(&self, cast: &Cast) -> Option<ScreenHandle> {
        let last = self.beginning.last()?;
        match last.resolve_destination(cast.resolver.as_ref()) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(scene = %last, error = %err, "Failed to resolve current screen");
                None
            }
        }
    }
}

/// Running story folded from completed actors.
pub(super) struct Progress {
    beginning: Story,
    story: Story,
}

impl Progress {
    pub(super) fn new(beginning: &Story, plotted: &Story) -> Self {
        Self {
            beginning: beginning.clone(),
            story: Story::new().with_base(plotted.shared_base()),
        }
    }

    /// Record a finished actor and return the absolute story reached so far.
    ///
    /// Only actors that left the stage on their destination move the story;
    /// a gated scene that unwound itself again does not.
    pub(super) fn record(&mut self, actor: &Actor) -> Story {
        if actor.advanced() {
            let scene = match actor.destination() {
                Some(handle) => actor.scene().freeze(handle.clone()),
                None => actor.scene().clone(),
            };
            self.story.append(scene);
        }
        relative(&self.story, &self.beginning).proofed()
    }
}
