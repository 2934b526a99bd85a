//! Transition operators and the executor seam.
//!
//! ```text
//! Scene.operator ──→ TransitionCatalog ──→ TransitionExecutor
//!                                               │
//!                     Completion  ←─────────────┘ (exactly once)
//! ```

mod executor;
mod operator;

pub use executor::{
    Completion, TransitionCatalog, TransitionExecutor, TransitionOutcome, TransitionRequest,
};
pub use operator::{operator_catalog, Direction, OperatorDef, TransitionOperator};
