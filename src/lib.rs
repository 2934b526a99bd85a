//! Declarative navigation choreography.
//!
//! Describe where the application should be as a [`Story`] of scenes; the
//! [`Stage`] plots the smallest change from where it is now and performs it
//! one transition at a time through the application's executors.

pub mod condition;
pub mod config;
pub mod logging;
pub mod narrative;
pub mod pipeline;
pub mod plot;
pub mod router;
pub mod screen;
pub mod stage;
pub mod transition;

pub use condition::{Condition, ConditionEvent, ConditionFlag};
pub use config::{ConfigError, RouteFile, StageConfig};
pub use narrative::{Capture, Narratable, Scene, SceneError, Script, ScriptError, Story};
pub use pipeline::{ActorOutcome, ActorReport, CancelHandle, Cast, Director, Editor};
pub use plot::{plot, relative, PlotError};
pub use router::{match_path, parse_path, RouteError, Router};
pub use screen::{ResolutionError, ScreenDescriptor, ScreenHandle, ScreenResolver};
pub use stage::{
    Performance, PerformanceOutcome, PerformanceReport, ScriptRegistry, Stage, StageError,
};
pub use transition::{
    Completion, TransitionCatalog, TransitionExecutor, TransitionOperator, TransitionOutcome,
    TransitionRequest,
};
