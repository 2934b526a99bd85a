//! URL router.
//!
//! Matches a path against the registered scripts by breadth-first reduction:
//! for each segment in turn, only scripts whose path scene at that depth
//! accepts the segment stay in the running.
//!
//! ```text
//!   path /foo/bar/bat/bing against /foo, /foo/bar/bam/bappo, /foo/bar/bat/zing, /foo/bar/bat/bing
//!
//!   foo:   - - - -
//!   bar:     - - -
//!   bat:       - -
//!   bing:        -
//! ```

use thiserror::Error;
use tracing::{debug, error};

use crate::narrative::{Script, ScriptError, Story};
use crate::stage::ScriptRegistry;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Failed to bind path: {0}")]
    Bind(#[from] ScriptError),

    #[error("Ambiguous route for '{path}': {candidates:?}")]
    Ambiguous {
        path: String,
        candidates: Vec<String>,
    },
}

/// Split a URL-shaped path into segments.
///
/// A leading slash is its own segment (`"/"`) so that it matches a root
/// scene; query and fragment are ignored.
pub fn parse_path(path: &str) -> Vec<String> {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();

    let mut segments = Vec::new();
    if path.starts_with('/') {
        segments.push("/".to_string());
    }
    segments.extend(
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string),
    );
    segments
}

/// Scripts whose path scenes accept every segment, in `scripts` order.
///
/// Scripts with more path scenes than segments are kept; they match a
/// prefix of their route.
pub fn reduce_candidates<'a, S: AsRef<str>>(segments: &[S], scripts: &'a [Script]) -> Vec<&'a Script> {
    segments
        .iter()
        .enumerate()
        .fold(scripts.iter().collect(), |mut candidates: Vec<&Script>, (index, segment)| {
            candidates.retain(|script| {
                script
                    .path_scenes()
                    .get(index)
                    .is_some_and(|scene| scene.matches_segment(segment.as_ref()))
            });
            candidates
        })
}

/// Find the script routing `segments` and bind it into a story.
///
/// More than one full-length match is a registration error: it is logged
/// and the first script in registration order wins, unless `strict` is set.
pub fn match_path<S: AsRef<str>>(
    segments: &[S],
    scripts: &[Script],
    strict: bool,
) -> Result<Option<Story>, RouteError> {
    let matches: Vec<&Script> = reduce_candidates(segments, scripts)
        .into_iter()
        .filter(|script| script.path_scenes().len() == segments.len())
        .collect();

    if matches.len() > 1 {
        let path = render(segments);
        let candidates: Vec<String> = matches.iter().map(|script| script.label()).collect();
        error!(%path, ?candidates, "Ambiguous route; scripts share a path shape");
        if strict {
            return Err(RouteError::Ambiguous { path, candidates });
        }
    }

    let Some(script) = matches.first() else {
        debug!(path = %render(segments), "No route");
        return Ok(None);
    };
    let story = script.bind_path(segments)?.to_story();
    debug!(script = %script.label(), story = %story, "Route matched");
    Ok(Some(story))
}

fn render<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(|segment| segment.as_ref())
        .filter(|segment| *segment != "/")
        .collect::<Vec<&str>>()
        .join("/");
    match segments.first() {
        Some(first) if first.as_ref() == "/" => format!("/{joined}"),
        _ => joined,
    }
}

/// Routes paths against a shared [`ScriptRegistry`].
#[derive(Debug, Clone)]
pub struct Router {
    registry: ScriptRegistry,
    strict: bool,
}

impl Router {
    pub fn new(registry: ScriptRegistry) -> Self {
        Self {
            registry,
            strict: false,
        }
    }

    /// Fail ambiguous matches instead of picking the first script.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Scripts still matching after reducing over `segments`.
    pub fn candidates<S: AsRef<str>>(&self, segments: &[S]) -> Vec<Script> {
        let scripts = self.registry.scripts();
        reduce_candidates(segments, &scripts)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn route<S: AsRef<str>>(&self, segments: &[S]) -> Result<Option<Story>, RouteError> {
        match_path(segments, &self.registry.scripts(), self.strict)
    }

    pub fn route_path(&self, path: &str) -> Result<Option<Story>, RouteError> {
        self.route(&parse_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::Narratable;
    use crate::screen::ScreenDescriptor;

    fn screen(name: &str) -> ScreenDescriptor {
        ScreenDescriptor::new("Main", name)
    }

    fn route(names: &[&str]) -> Script {
        names
            .iter()
            .fold(Script::named(names.join("/")).root(screen("main")), |script, name| {
                script.push(screen(name))
            })
    }

    #[test]
    fn parse_path_keeps_leading_slash() {
        assert_eq!(parse_path("/a/b"), vec!["/", "a", "b"]);
        assert_eq!(parse_path("a//b/"), vec!["a", "b"]);
        assert_eq!(parse_path("/a?tab=2#top"), vec!["/", "a"]);
        assert_eq!(parse_path("/"), vec!["/"]);
    }

    #[test]
    fn reduction_narrows_breadth_first() {
        let scripts = vec![
            route(&["foo"]),
            route(&["foo", "bar", "bam", "bappo"]),
            route(&["foo", "bar", "bat", "zing"]),
            route(&["foo", "bar", "bat", "bing"]),
        ];

        assert_eq!(reduce_candidates(&parse_path("/foo"), &scripts).len(), 4);
        assert_eq!(reduce_candidates(&parse_path("/foo/bar/bat"), &scripts).len(), 2);

        let story = match_path(&parse_path("/foo/bar/bat/bing"), &scripts, false)
            .unwrap()
            .unwrap();
        assert_eq!(story.shorthand(), "/(main), >(foo), >(bar), >(bat), >(bing)");
    }

    #[test]
    fn prefix_of_a_longer_route_is_not_a_match() {
        let scripts = vec![route(&["foo", "bar"])];
        assert!(match_path(&parse_path("/foo"), &scripts, false).unwrap().is_none());
        assert!(match_path(&parse_path("/foo/bar/baz"), &scripts, false)
            .unwrap()
            .is_none());
    }

    #[test]
    fn ambiguous_routes_pick_first_unless_strict() {
        let first = Script::named("first")
            .push_capture(r"\d+", "id", |input| screen("first").with_identity(input))
            .unwrap();
        let second = Script::named("second")
            .push_capture(r"[0-9a-f]+", "hex", |input| screen("second").with_identity(input))
            .unwrap();
        let scripts = vec![first, second];

        let story = match_path(&["42"], &scripts, false).unwrap().unwrap();
        assert_eq!(story.last().unwrap().destination().unwrap().name(), "first");

        let err = match_path(&["42"], &scripts, true).unwrap_err();
        assert!(matches!(err, RouteError::Ambiguous { candidates, .. } if candidates == ["first", "second"]));

        // Only the hex pattern accepts letters.
        let story = match_path(&["beef"], &scripts, true).unwrap().unwrap();
        assert_eq!(story.last().unwrap().destination().unwrap().name(), "second");
    }

    #[test]
    fn router_reads_the_shared_registry() {
        let registry = ScriptRegistry::new();
        let router = Router::new(registry.clone()).strict(true);
        assert!(router.route_path("/foo").unwrap().is_none());

        registry.register(route(&["foo"]));
        assert!(router.route_path("/foo").unwrap().is_some());
        assert_eq!(router.candidates(&["/"]).len(), 1);
    }
}
