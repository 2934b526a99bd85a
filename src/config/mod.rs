//! Route file and stage configuration.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{RouteFile, ScriptDef, StageConfig, StepDef};
