//! Screen descriptors, opaque screen handles and the resolver seam.
//!
//! The engine never looks inside a [`ScreenHandle`]; it only threads handles
//! from one transition to the next. Producing them is the job of the
//! application's [`ScreenResolver`].

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use thiserror::Error;

/// Value identifier for a destination screen.
///
/// Two descriptors denote the same screen when both the type identifier and
/// the identity match. The name is what the screen contributes to a route
/// path and is not part of equality.
#[derive(Debug, Clone)]
pub struct ScreenDescriptor {
    type_id: String,
    identity: String,
    name: String,
}

impl ScreenDescriptor {
    /// Create a descriptor whose identity is its name.
    pub fn new(type_id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            type_id: type_id.into(),
            identity: name.clone(),
            name,
        }
    }

    /// Override the identity, e.g. for screens parameterized by an input.
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ScreenDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.identity == other.identity
    }
}

impl Eq for ScreenDescriptor {}

impl Hash for ScreenDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.identity.hash(state);
    }
}

impl fmt::Display for ScreenDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_id, self.identity)
    }
}

/// Opaque handle to a live screen, produced by a [`ScreenResolver`].
///
/// Cloning a handle shares the same underlying screen.
#[derive(Clone)]
pub struct ScreenHandle {
    inner: Arc<dyn Any + Send + Sync>,
}

impl ScreenHandle {
    pub fn new<T: Any + Send + Sync>(screen: T) -> Self {
        Self {
            inner: Arc::new(screen),
        }
    }

    /// Borrow the application's screen value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Whether both handles point at the same screen instance.
    pub fn same_screen(&self, other: &ScreenHandle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl fmt::Debug for ScreenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScreenHandle({:p})", Arc::as_ptr(&self.inner))
    }
}

/// The resolver could not produce a screen for a descriptor.
#[derive(Debug, Clone, Error)]
#[error("Failed to resolve screen '{descriptor}': {reason}")]
pub struct ResolutionError {
    pub descriptor: String,
    pub reason: String,
}

impl ResolutionError {
    pub fn new(descriptor: &ScreenDescriptor, reason: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }
}

/// Produces (or looks up) the live screen for a descriptor.
///
/// The engine asks once per scene execution and keeps the handle it gets
/// back for the rest of that scene's lifetime.
pub trait ScreenResolver: Send + Sync {
    fn resolve(&self, descriptor: &ScreenDescriptor) -> Result<ScreenHandle, ResolutionError>;
}
