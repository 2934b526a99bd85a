//! Scenes: single transition steps within a story or script.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use crate::condition::Condition;
use crate::screen::{ResolutionError, ScreenDescriptor, ScreenHandle, ScreenResolver};
use crate::transition::TransitionOperator;

/// Errors raised while turning a scene into a concrete screen.
#[derive(Debug, Clone, Error)]
pub enum SceneError {
    #[error("Capture '{label}' has no bound input")]
    MissingInput { label: String },

    #[error("Input '{input}' does not match pattern '{pattern}'")]
    PatternMismatch { input: String, pattern: String },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

type Factory = Arc<dyn Fn(&str) -> ScreenDescriptor + Send + Sync>;

/// Input capture for a scene whose destination depends on a path segment
/// or user-supplied value.
#[derive(Clone)]
pub struct Capture {
    pattern: String,
    regex: Regex,
    label: String,
    factory: Factory,
    input: Option<String>,
}

impl Capture {
    /// Build a capture. The pattern must match the whole input.
    pub fn new<F>(pattern: &str, label: impl Into<String>, factory: F) -> Result<Self, regex::Error>
    where
        F: Fn(&str) -> ScreenDescriptor + Send + Sync + 'static,
    {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            label: label.into(),
            factory: Arc::new(factory),
            input: None,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn matches(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Copy of this capture bound to `input`.
    pub fn bind(&self, input: &str) -> Result<Self, SceneError> {
        if !self.matches(input) {
            return Err(SceneError::PatternMismatch {
                input: input.to_string(),
                pattern: self.pattern.clone(),
            });
        }
        let mut bound = self.clone();
        bound.input = Some(input.to_string());
        Ok(bound)
    }

    /// Descriptor produced from the bound input.
    pub fn destination(&self) -> Result<ScreenDescriptor, SceneError> {
        let input = self.input.as_deref().ok_or_else(|| SceneError::MissingInput {
            label: self.label.clone(),
        })?;
        Ok((self.factory)(input))
    }
}

impl fmt::Debug for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capture")
            .field("label", &self.label)
            .field("pattern", &self.pattern)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
enum SceneKind {
    Plain {
        destination: Option<ScreenDescriptor>,
    },
    Capture(Capture),
    /// A screen that is already live; the stage records completed scenes this way.
    Frozen {
        destination: ScreenDescriptor,
        handle: ScreenHandle,
    },
    /// Synthetic return-to-origin step produced by [`Scene::inverse`].
    Inverse {
        origin: Option<ScreenDescriptor>,
        handle: Option<ScreenHandle>,
    },
    /// Path-only marker with no destination.
    Prop { name: String },
}

/// One transition step: destination, operator and optional guard.
#[derive(Clone)]
pub struct Scene {
    kind: SceneKind,
    operator: TransitionOperator,
    source: Option<ScreenDescriptor>,
    condition: Option<Arc<dyn Condition>>,
    junction_peer: Option<usize>,
}

impl Scene {
    pub fn new(operator: TransitionOperator, destination: Option<ScreenDescriptor>) -> Self {
        Self::with_kind(SceneKind::Plain { destination }, operator)
    }

    pub fn capture(operator: TransitionOperator, capture: Capture) -> Self {
        Self::with_kind(SceneKind::Capture(capture), operator)
    }

    /// Scene for a screen that is already on stage.
    pub fn frozen(
        operator: TransitionOperator,
        destination: ScreenDescriptor,
        handle: ScreenHandle,
    ) -> Self {
        Self::with_kind(SceneKind::Frozen { destination, handle }, operator)
    }

    /// Named path segment with no destination of its own.
    pub fn prop(name: impl Into<String>) -> Self {
        Self::with_kind(
            SceneKind::Prop { name: name.into() },
            TransitionOperator::None,
        )
    }

    pub fn root(screen: ScreenDescriptor) -> Self {
        Self::new(TransitionOperator::Root, Some(screen))
    }

    pub fn select(screen: ScreenDescriptor) -> Self {
        Self::new(TransitionOperator::Select, Some(screen))
    }

    pub fn set(screen: ScreenDescriptor) -> Self {
        Self::new(TransitionOperator::Set, Some(screen))
    }

    pub fn embed(screen: ScreenDescriptor, container: ScreenDescriptor) -> Self {
        Self::new(TransitionOperator::Embed, Some(screen)).from(container)
    }

    pub fn push(screen: ScreenDescriptor) -> Self {
        Self::new(TransitionOperator::Push, Some(screen))
    }

    pub fn pop() -> Self {
        Self::new(TransitionOperator::Pop, None)
    }

    pub fn pop_to(screen: ScreenDescriptor) -> Self {
        Self::new(TransitionOperator::PopTo, Some(screen))
    }

    pub fn pop_to_root() -> Self {
        Self::new(TransitionOperator::PopToRoot, None)
    }

    pub fn present(screen: ScreenDescriptor) -> Self {
        Self::new(TransitionOperator::Present, Some(screen))
    }

    pub fn dismiss() -> Self {
        Self::new(TransitionOperator::Dismiss, None)
    }

    pub fn dismiss_from(screen: ScreenDescriptor) -> Self {
        Self::new(TransitionOperator::DismissFrom, Some(screen))
    }

    pub fn unwind(screen: ScreenDescriptor) -> Self {
        Self::new(TransitionOperator::Unwind, Some(screen))
    }

    fn with_kind(kind: SceneKind, operator: TransitionOperator) -> Self {
        Self {
            kind,
            operator,
            source: None,
            condition: None,
            junction_peer: None,
        }
    }

    /// Explicit source screen; always wins over the screen handed over by
    /// the previous step.
    pub fn from(mut self, source: ScreenDescriptor) -> Self {
        self.source = Some(source);
        self
    }

    /// Gate this scene on `condition`: it is skipped while the condition
    /// holds and unwound once it becomes true.
    pub fn unless(mut self, condition: Arc<dyn Condition>) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn operator(&self) -> TransitionOperator {
        self.operator
    }

    pub fn source(&self) -> Option<&ScreenDescriptor> {
        self.source.as_ref()
    }

    pub fn condition(&self) -> Option<&Arc<dyn Condition>> {
        self.condition.as_ref()
    }

    /// Index of the scene that follows this junction in the owning story.
    pub fn junction_peer(&self) -> Option<usize> {
        self.junction_peer
    }

    pub(crate) fn set_junction_peer(&mut self, peer: Option<usize>) {
        self.junction_peer = peer;
    }

    /// A junction scene branches into the scene after it and does not
    /// contribute a path segment of its own.
    pub fn is_junction(&self) -> bool {
        self.junction_peer.is_some()
    }

    pub fn is_root(&self) -> bool {
        self.operator.is_root()
    }

    pub fn is_prop(&self) -> bool {
        matches!(self.kind, SceneKind::Prop { .. })
    }

    pub fn as_capture(&self) -> Option<&Capture> {
        match &self.kind {
            SceneKind::Capture(capture) => Some(capture),
            _ => None,
        }
    }

    /// Destination descriptor, when one is known without resolving anything.
    ///
    /// Captures only have a destination once an input is bound.
    pub fn destination(&self) -> Option<ScreenDescriptor> {
        match &self.kind {
            SceneKind::Plain { destination } => destination.clone(),
            SceneKind::Capture(capture) => capture.destination().ok(),
            SceneKind::Frozen { destination, .. } => Some(destination.clone()),
            SceneKind::Inverse { .. } | SceneKind::Prop { .. } => None,
        }
    }

    pub fn name(&self) -> String {
        match &self.kind {
            SceneKind::Plain { destination } => destination
                .as_ref()
                .map_or_else(|| "???".to_string(), |d| d.name().to_string()),
            SceneKind::Capture(capture) => capture
                .input()
                .map_or_else(|| capture.pattern().to_string(), str::to_string),
            SceneKind::Frozen { destination, .. } => destination.name().to_string(),
            SceneKind::Inverse { .. } => "../".to_string(),
            SceneKind::Prop { name } => name.clone(),
        }
    }

    /// What this scene contributes to a route path.
    pub fn segment(&self) -> String {
        if self.is_root() {
            return "/".to_string();
        }
        match &self.kind {
            SceneKind::Capture(capture) if capture.input().is_none() => {
                format!("{}=({})", capture.label(), capture.pattern())
            }
            _ => self.name(),
        }
    }

    /// Whether a path segment selects this scene.
    pub fn matches_segment(&self, segment: &str) -> bool {
        match &self.kind {
            SceneKind::Capture(capture) => capture.matches(segment),
            _ => self.segment().to_lowercase() == segment.to_lowercase(),
        }
    }

    pub fn shorthand(&self) -> String {
        match &self.kind {
            SceneKind::Capture(capture) if capture.input().is_none() => format!(
                "{}({}={})",
                self.operator.symbol(),
                capture.label(),
                capture.pattern()
            ),
            _ => format!("{}({})", self.operator.symbol(), self.name()),
        }
    }

    /// Copy of this capture scene bound to `input`; other scenes are returned as-is.
    pub fn bind_input(&self, input: &str) -> Result<Scene, SceneError> {
        let mut bound = self.clone();
        if let SceneKind::Capture(capture) = &self.kind {
            bound.kind = SceneKind::Capture(capture.bind(input)?);
        }
        Ok(bound)
    }

    pub fn resolve_destination(
        &self,
        resolver: &dyn ScreenResolver,
    ) -> Result<Option<ScreenHandle>, SceneError> {
        match &self.kind {
            SceneKind::Plain { destination } => destination
                .as_ref()
                .map(|d| resolver.resolve(d))
                .transpose()
                .map_err(SceneError::from),
            SceneKind::Capture(capture) => Ok(Some(resolver.resolve(&capture.destination()?)?)),
            SceneKind::Frozen { handle, .. } => Ok(Some(handle.clone())),
            SceneKind::Inverse { origin, handle } => match (handle, origin) {
                (Some(handle), _) => Ok(Some(handle.clone())),
                (None, Some(origin)) => Ok(Some(resolver.resolve(origin)?)),
                (None, None) => Ok(None),
            },
            SceneKind::Prop { .. } => Ok(None),
        }
    }

    pub fn resolve_source(
        &self,
        resolver: &dyn ScreenResolver,
    ) -> Result<Option<ScreenHandle>, SceneError> {
        self.source
            .as_ref()
            .map(|source| resolver.resolve(source))
            .transpose()
            .map_err(SceneError::from)
    }

    /// Synthetic scene returning from this scene's destination to its source.
    ///
    /// Fails when the destination cannot be recovered (an unbound capture).
    pub fn inverse(&self) -> Result<Scene, SceneError> {
        let (origin, handle) = match &self.kind {
            SceneKind::Plain { destination } => (destination.clone(), None),
            SceneKind::Capture(capture) => (Some(capture.destination()?), None),
            SceneKind::Frozen { destination, handle } => {
                (Some(destination.clone()), Some(handle.clone()))
            }
            SceneKind::Inverse { origin, handle } => (origin.clone(), handle.clone()),
            SceneKind::Prop { .. } => (None, None),
        };
        Ok(Self::with_kind(
            SceneKind::Inverse { origin, handle },
            self.operator.inverse(),
        ))
    }

    /// Record that this scene's destination is now live as `handle`.
    pub(crate) fn freeze(&self, handle: ScreenHandle) -> Scene {
        match self.destination() {
            Some(destination) => Self::frozen(self.operator, destination, handle),
            None => self.clone(),
        }
    }
}

/// Scenes are the same step when destination and operator match.
impl PartialEq for Scene {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.destination() == other.destination()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("shorthand", &self.shorthand())
            .field("source", &self.source)
            .field("gated", &self.condition.is_some())
            .field("junction_peer", &self.junction_peer)
            .finish()
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shorthand())
    }
}
