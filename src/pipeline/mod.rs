//! Execution pipeline.
//!
//! ```text
//!   plotted story:   scene 1 ──► scene 2 ──► scene 3
//!                       │           │           │
//!   actors:          actor 1 ──► actor 2 ──► actor 3     (each waits for the previous)
//!                       │           │           │
//!   progress:        story 1     story 2     story 3     (published in order)
//! ```
//!
//! A [`Director`] runs a chain asynchronously, awaiting each transition. An
//! [`Editor`] runs the same chain inline as a structural edit.

mod actor;
mod cancel;
mod director;
mod editor;

use std::fmt;
use std::sync::Arc;

use crate::screen::ScreenResolver;
use crate::transition::TransitionCatalog;

pub use actor::{ActorOutcome, ActorReport, ActorState};
pub use cancel::CancelHandle;
pub use director::Director;
pub use editor::Editor;

/// External collaborators the actors perform with.
#[derive(Clone)]
pub struct Cast {
    pub catalog: TransitionCatalog,
    pub resolver: Arc<dyn ScreenResolver>,
}

impl Cast {
    pub fn new(catalog: TransitionCatalog, resolver: Arc<dyn ScreenResolver>) -> Self {
        Self { catalog, resolver }
    }
}

impl fmt::Debug for Cast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cast")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}
