//! Scripts: reusable, routable scene templates.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use super::narrate::Narratable;
use super::scene::{Capture, Scene, SceneError};
use super::story::Story;
use crate::screen::ScreenDescriptor;
use crate::transition::TransitionOperator;

/// Errors raised while declaring or binding a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Expected {expected} inputs, got {got}")]
    InputCountMismatch { expected: usize, got: usize },

    #[error("Expected {expected} path segments, got {got}")]
    SegmentCountMismatch { expected: usize, got: usize },

    #[error("Segment '{input}' does not match pattern '{pattern}'")]
    PatternMismatch { input: String, pattern: String },

    #[error("Segment '{segment}' does not match scene '{expected}'")]
    SegmentMismatch { segment: String, expected: String },

    #[error("Capture '{label}' is not part of the path and has no segment to bind")]
    MissingSegment { label: String },

    #[error(transparent)]
    Scene(SceneError),

    #[error("Invalid capture pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl From<SceneError> for ScriptError {
    fn from(err: SceneError) -> Self {
        match err {
            SceneError::PatternMismatch { input, pattern } => {
                ScriptError::PatternMismatch { input, pattern }
            }
            other => ScriptError::Scene(other),
        }
    }
}

/// Named template of scenes.
///
/// A script is never performed directly: bind its captures to concrete
/// inputs, then turn it into a [`Story`].
#[derive(Clone)]
pub struct Script {
    id: Uuid,
    name: Option<String>,
    scenes: Story,
}

impl Script {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            scenes: Story::new(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        let mut script = Self::new();
        script.name = Some(name.into());
        script
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name if set, otherwise the script id.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }

    pub fn scenes(&self) -> &[Scene] {
        self.scenes.scenes()
    }

    pub fn append(&mut self, scene: Scene) {
        self.scenes.append(scene);
    }

    /// Append a scene whose destination is built from a captured input.
    pub fn capture<F>(
        self,
        operator: TransitionOperator,
        pattern: &str,
        label: &str,
        factory: F,
    ) -> Result<Self, ScriptError>
    where
        F: Fn(&str) -> ScreenDescriptor + Send + Sync + 'static,
    {
        let capture = Capture::new(pattern, label, factory).map_err(|source| {
            ScriptError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(self.segue(Scene::capture(operator, capture)))
    }

    /// Like [`Script::capture`], converting the input before building the
    /// destination.
    pub fn capture_with<T, P, F>(
        self,
        operator: TransitionOperator,
        pattern: &str,
        label: &str,
        parse: P,
        factory: F,
    ) -> Result<Self, ScriptError>
    where
        P: Fn(&str) -> T + Send + Sync + 'static,
        F: Fn(T) -> ScreenDescriptor + Send + Sync + 'static,
    {
        self.capture(operator, pattern, label, move |input| factory(parse(input)))
    }

    pub fn push_capture<F>(self, pattern: &str, label: &str, factory: F) -> Result<Self, ScriptError>
    where
        F: Fn(&str) -> ScreenDescriptor + Send + Sync + 'static,
    {
        self.capture(TransitionOperator::Push, pattern, label, factory)
    }

    pub fn present_capture<F>(
        self,
        pattern: &str,
        label: &str,
        factory: F,
    ) -> Result<Self, ScriptError>
    where
        F: Fn(&str) -> ScreenDescriptor + Send + Sync + 'static,
    {
        self.capture(TransitionOperator::Present, pattern, label, factory)
    }

    pub fn set_capture<F>(self, pattern: &str, label: &str, factory: F) -> Result<Self, ScriptError>
    where
        F: Fn(&str) -> ScreenDescriptor + Send + Sync + 'static,
    {
        self.capture(TransitionOperator::Set, pattern, label, factory)
    }

    /// Path-only segment; dropped when the script becomes a story.
    pub fn prop(self, name: impl Into<String>) -> Self {
        self.segue(Scene::prop(name))
    }

    /// Scenes that contribute a path segment (everything except junctions).
    pub fn path_scenes(&self) -> Vec<&Scene> {
        self.scenes().iter().filter(|s| !s.is_junction()).collect()
    }

    /// Route template, e.g. `/categories/category=([\w-]+)`.
    pub fn path_representation(&self) -> String {
        self.path_scenes()
            .iter()
            .map(|scene| if scene.is_root() { String::new() } else { scene.segment() })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// `(label, pattern)` for each capture on the path, in order.
    pub fn capture_segments(&self) -> Vec<(String, String)> {
        self.path_scenes()
            .iter()
            .filter_map(|scene| scene.as_capture())
            .map(|c| (c.label().to_string(), c.pattern().to_string()))
            .collect()
    }

    /// Bind captures to `inputs` in declaration order.
    pub fn bind_inputs<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Script, ScriptError> {
        let expected = self.scenes().iter().filter(|s| s.as_capture().is_some()).count();
        if inputs.len() != expected {
            return Err(ScriptError::InputCountMismatch {
                expected,
                got: inputs.len(),
            });
        }

        let mut inputs = inputs.iter();
        let mut bound = self.rebuilt();
        for scene in self.scenes() {
            let input = match scene.as_capture() {
                Some(_) => inputs.next(),
                None => None,
            };
            let scene = match input {
                Some(input) => scene.bind_input(input.as_ref())?,
                None => scene.clone(),
            };
            bound.append(scene);
        }
        Ok(bound)
    }

    /// Bind path segments to path scenes, validating each one.
    pub fn bind_path<S: AsRef<str>>(&self, segments: &[S]) -> Result<Script, ScriptError> {
        let expected = self.path_scenes().len();
        if segments.len() != expected {
            return Err(ScriptError::SegmentCountMismatch {
                expected,
                got: segments.len(),
            });
        }

        let mut segments = segments.iter();
        let mut bound = self.rebuilt();
        for scene in self.scenes() {
            let segment: Option<&str> = if scene.is_junction() {
                None
            } else {
                segments.next().map(|segment| segment.as_ref())
            };
            let scene = match (scene.as_capture(), segment) {
                (Some(_), Some(segment)) => scene.bind_input(segment)?,
                (Some(capture), None) => {
                    return Err(ScriptError::MissingSegment {
                        label: capture.label().to_string(),
                    })
                }
                (None, Some(segment)) if !scene.matches_segment(segment) => {
                    return Err(ScriptError::SegmentMismatch {
                        segment: segment.to_string(),
                        expected: scene.segment(),
                    })
                }
                (None, _) => scene.clone(),
            };
            bound.append(scene);
        }
        Ok(bound)
    }

    /// Executable story for this script. Props are dropped.
    pub fn to_story(&self) -> Story {
        Story::from_scenes(self.scenes().iter().filter(|s| !s.is_prop()).cloned())
    }

    fn rebuilt(&self) -> Script {
        Script {
            id: self.id,
            name: self.name.clone(),
            scenes: Story::new(),
        }
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl Narratable for Script {
    fn segue(mut self, scene: Scene) -> Self {
        self.append(scene);
        self
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("path", &self.path_representation())
            .finish()
    }
}
