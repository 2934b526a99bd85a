//! Script registry.
//!
//! Explicit, cloneable registry of routable scripts, shared by the stage and
//! the router for the lifetime of the application context.

use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::narrative::Script;

/// Thread-safe list of registered scripts, kept in registration order.
///
/// Registration order matters: it is the tie-break when more than one
/// script matches a path.
#[derive(Clone, Default)]
pub struct ScriptRegistry {
    inner: Arc<RwLock<Vec<Script>>>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script. Registering the same script id again replaces it
    /// in place.
    pub fn register(&self, script: Script) {
        let mut scripts = self.inner.write();
        if let Some(existing) = scripts.iter_mut().find(|s| s.id() == script.id()) {
            *existing = script;
            return;
        }
        tracing::info!(
            script = %script.label(),
            path = %script.path_representation(),
            "Script registered"
        );
        scripts.push(script);
    }

    pub fn unregister(&self, id: Uuid) -> Option<Script> {
        let mut scripts = self.inner.write();
        let index = scripts.iter().position(|s| s.id() == id)?;
        Some(scripts.remove(index))
    }

    /// Snapshot of all scripts in registration order.
    pub fn scripts(&self) -> Vec<Script> {
        self.inner.read().clone()
    }

    pub fn find(&self, name: &str) -> Option<Script> {
        self.inner
            .read()
            .iter()
            .find(|s| s.name() == Some(name))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl std::fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.inner.read().iter()).finish()
    }
}
