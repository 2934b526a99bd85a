//! Navigation model.
//!
//! ```text
//!   Script  ──bind_inputs / bind_path──►  Script (bound)  ──to_story──►  Story
//!     │                                                                   │
//!     └── Scene ... Scene                                   Scene ... Scene (+ base)
//! ```
//!
//! Scripts are routable templates; stories are what the stage performs.

mod narrate;
mod scene;
mod script;
mod story;

pub use narrate::Narratable;
pub use scene::{Capture, Scene, SceneError};
pub use script::{Script, ScriptError};
pub use story::Story;
