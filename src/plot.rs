//! Plotting: the diff algebra over stories.
//!
//! [`plot`] computes the smallest story that takes the stage from one story
//! to another. [`relative`] folds a partial story back into a running one
//! while a pipeline makes progress.
//!
//! All comparisons are made on proofed (absolute) scene lists, and prefix
//! containment is strict: equal-length lists never contain each other.

use thiserror::Error;
use tracing::error;

use crate::narrative::{Scene, SceneError, Story};

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Cannot invert scene '{scene}': {source}")]
    MissingInverse {
        scene: String,
        #[source]
        source: SceneError,
    },

    /// Plotting a story back to the story it is relative to is not
    /// supported; failing beats guessing a wrong route.
    #[error("Cannot plot a relative story back to its own base")]
    ReceiverRelativeToTarget,
}

/// Smallest story that reaches `to` when performed from `from`.
///
/// Rules, first match wins:
/// 1. same proofed scenes: empty story based on `from`
/// 2. `to` extends `from`: the extra scenes, based on `from`
/// 3. `from` extends `to`: inverses of `from`'s extra scenes, last applied
///    first, based on `from`
/// 4. `to` is relative to `from`: `to`
/// 5. `from` is relative to `to`: [`PlotError::ReceiverRelativeToTarget`]
/// 6. unrelated: `to`, proofed into an absolute story rather than returned
///    verbatim. Scenes that cancel out (a push followed by its pop) are
///    dropped and a relative `to` is rebased; the stage ends up in the same
///    place with fewer transitions.
pub fn plot(from: &Story, to: &Story) -> Result<Story, PlotError> {
    let from_scenes = from.proofed_scenes();
    let to_scenes = to.proofed_scenes();

    if from_scenes == to_scenes {
        return Ok(Story::new().based_on(from.clone()));
    }

    if let Some(suffix) = strict_suffix(&from_scenes, &to_scenes) {
        return Ok(Story::from_scenes(suffix.iter().cloned()).based_on(from.clone()));
    }

    if let Some(suffix) = strict_suffix(&to_scenes, &from_scenes) {
        let inverses = suffix
            .iter()
            .rev()
            .map(|scene| {
                scene.inverse().map_err(|source| PlotError::MissingInverse {
                    scene: scene.shorthand(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Story::from_scenes(inverses).based_on(from.clone()));
    }

    if to.base().is_some_and(|base| base == from) {
        return Ok(to.clone());
    }

    if from.base().is_some_and(|base| base == to) {
        error!(from = %from.shorthand(), to = %to.shorthand(), "Cannot plot a relative story back to its base");
        return Err(PlotError::ReceiverRelativeToTarget);
    }

    Ok(to.proofed())
}

/// Fold `this` into `other`.
///
/// Containment in either direction and "other is relative to this" keep
/// `this`; when `this` is relative to `other` the result is `this` applied to
/// `other`; unrelated stories keep `this`.
pub fn relative(this: &Story, other: &Story) -> Story {
    if this == other || this.is_subplot_of(other) || this.is_superplot_of(other) {
        return this.clone();
    }
    if this.base().is_some_and(|base| base == other) {
        return this.proofed();
    }
    this.clone()
}

fn strict_suffix<'a>(prefix: &[Scene], full: &'a [Scene]) -> Option<&'a [Scene]> {
    (full.len() > prefix.len() && full.starts_with(prefix)).then(|| &full[prefix.len()..])
}
