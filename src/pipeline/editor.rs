//! Editor: rewrites navigation history in place, without animation.

use tracing::info;

use super::actor::ActorReport;
use super::director::{Director, Progress};
use super::Cast;
use crate::narrative::Story;
use crate::plot::PlotError;

/// Structural edit from the current story to a new one.
///
/// Runs the same actor chain a [`Director`] would, but inline: transitions
/// are not animated, gates are ignored and executor completion is not
/// awaited.
pub struct Editor {
    director: Director,
}

impl Editor {
    pub fn assemble(beginning: Story, ending: &Story) -> Result<Self, PlotError> {
        Ok(Self {
            director: Director::assemble(beginning, ending, false)?,
        })
    }

    /// Apply every edit and return the resulting absolute story.
    pub fn edit(&mut self, cast: &Cast) -> Story {
        let director = &mut self.director;
        info!(delta = %director.plotted.shorthand(), "Inserting story");

        let mut progress = Progress::new(&director.beginning, &director.plotted);
        let mut reached = director.beginning.proofed();
        let mut source = director.opening_screen(cast);
        for actor in &mut director.actors {
            actor.perform_inline(cast, source.clone());
            source = actor.destination().cloned();
            reached = progress.record(actor);
        }
        reached
    }

    pub fn reports(&self) -> Vec<ActorReport> {
        self.director.reports()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionFlag;
    use crate::narrative::{Narratable, Scene};
    use crate::screen::{ResolutionError, ScreenDescriptor, ScreenHandle, ScreenResolver};
    use crate::transition::{
        Completion, TransitionCatalog, TransitionExecutor, TransitionOperator, TransitionRequest,
    };
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Holds on to completions without ever finishing them.
    #[derive(Default)]
    struct Stalled {
        requests: Mutex<Vec<(TransitionOperator, bool)>>,
        pending: Mutex<Vec<Completion>>,
    }

    impl TransitionExecutor for Stalled {
        fn execute(&self, request: TransitionRequest, completion: Completion) {
            self.requests.lock().push((request.operator, request.animated));
            self.pending.lock().push(completion);
        }
    }

    struct Named;

    impl ScreenResolver for Named {
        fn resolve(&self, descriptor: &ScreenDescriptor) -> Result<ScreenHandle, ResolutionError> {
            Ok(ScreenHandle::new(descriptor.name().to_string()))
        }
    }

    fn screen(name: &str) -> ScreenDescriptor {
        ScreenDescriptor::new("Main", name)
    }

    #[test]
    fn edits_run_inline_without_waiting() {
        let executor = Arc::new(Stalled::default());
        let cast = Cast::new(TransitionCatalog::new(executor.clone()), Arc::new(Named));
        let beginning = Story::new().root(screen("main"));
        let gate = Arc::new(ConditionFlag::unset());
        let ending = beginning
            .clone()
            .push(screen("list"))
            .segue(Scene::present(screen("login")).unless(gate));

        let mut editor = Editor::assemble(beginning, &ending).unwrap();
        let reached = editor.edit(&cast);

        assert_eq!(reached, ending);
        assert_eq!(
            *executor.requests.lock(),
            vec![
                (TransitionOperator::Push, false),
                (TransitionOperator::Present, false)
            ]
        );
        assert_eq!(editor.reports().len(), 2);
    }
}
