//! Stories: concrete, executable scene sequences.

use std::fmt;
use std::sync::Arc;

use super::narrate::Narratable;
use super::scene::Scene;

/// Ordered list of scenes, optionally relative to a base story.
///
/// A relative story only makes sense together with its base; [`Story::proofed`]
/// merges the two into an absolute story.
#[derive(Clone, Default)]
pub struct Story {
    scenes: Vec<Scene>,
    base: Option<Arc<Story>>,
}

impl Story {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_scenes(scenes: impl IntoIterator<Item = Scene>) -> Self {
        let mut story = Self::new();
        for scene in scenes {
            story.append(scene);
        }
        story
    }

    /// Make this story relative to `base`.
    pub fn based_on(mut self, base: Story) -> Self {
        self.base = Some(Arc::new(base));
        self
    }

    pub(crate) fn with_base(mut self, base: Option<Arc<Story>>) -> Self {
        self.base = base;
        self
    }

    /// Append a scene, linking it as the peer of a preceding junction.
    pub fn append(&mut self, mut scene: Scene) {
        scene.set_junction_peer(None);
        let index = self.scenes.len();
        if let Some(previous) = self.scenes.last_mut() {
            if previous.operator().is_junction() {
                previous.set_junction_peer(Some(index));
            }
        }
        self.scenes.push(scene);
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn base(&self) -> Option<&Story> {
        self.base.as_deref()
    }

    pub(crate) fn shared_base(&self) -> Option<Arc<Story>> {
        self.base.clone()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn last(&self) -> Option<&Scene> {
        self.scenes.last()
    }

    /// Absolute scene list: the base's proofed scenes with this story's
    /// scenes applied in order. Forward scenes are appended; backward scenes
    /// remove the last scene, or are kept verbatim when nothing is left to
    /// remove.
    pub fn proofed_scenes(&self) -> Vec<Scene> {
        let mut normalized = self.base.as_ref().map(|b| b.proofed_scenes()).unwrap_or_default();
        for scene in &self.scenes {
            if scene.operator().is_forward() {
                normalized.push(scene.clone());
            } else if normalized.pop().is_none() {
                normalized.push(scene.clone());
            }
        }
        normalized
    }

    /// Absolute copy of this story.
    pub fn proofed(&self) -> Story {
        Story::from_scenes(self.proofed_scenes())
    }

    /// Whether this story strictly extends `parent`.
    pub fn is_subplot_of(&self, parent: &Story) -> bool {
        is_strict_prefix(&parent.proofed_scenes(), &self.proofed_scenes())
    }

    /// Whether `child` strictly extends this story.
    pub fn is_superplot_of(&self, child: &Story) -> bool {
        is_strict_prefix(&self.proofed_scenes(), &child.proofed_scenes())
    }

    /// Compact rendering of the proofed scenes, e.g. `/(main), >(detail)`.
    pub fn shorthand(&self) -> String {
        self.proofed_scenes()
            .iter()
            .map(Scene::shorthand)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn is_strict_prefix(prefix: &[Scene], full: &[Scene]) -> bool {
    full.len() > prefix.len() && full.starts_with(prefix)
}

impl PartialEq for Story {
    fn eq(&self, other: &Self) -> bool {
        self.proofed_scenes() == other.proofed_scenes()
    }
}

impl Narratable for Story {
    fn segue(mut self, scene: Scene) -> Self {
        self.append(scene);
        self
    }
}

impl fmt::Debug for Story {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Story")
            .field("scenes", &self.scenes)
            .field("relative", &self.base.is_some())
            .finish()
    }
}

impl fmt::Display for Story {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shorthand())
    }
}
