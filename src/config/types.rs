use serde::{Deserialize, Serialize};

/// Root of a route file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteFile {
    #[serde(default)]
    pub stage: StageConfig,
    /// Routable scripts, in registration order.
    #[serde(default)]
    pub scripts: Vec<ScriptDef>,
}

/// Stage behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Animate performed transitions (default: true).
    #[serde(default = "default_animated")]
    pub animated: bool,
    /// Fail ambiguous route matches instead of picking the first script
    /// (default: false).
    #[serde(default)]
    pub strict_routes: bool,
}

fn default_animated() -> bool {
    true
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            animated: default_animated(),
            strict_routes: false,
        }
    }
}

/// Declarative script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDef {
    /// Unique script name (e.g., "category").
    pub name: String,
    pub steps: Vec<StepDef>,
}

/// One step of a declarative script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDef {
    /// Operator name (e.g., "push", "pop_to_root"), or "prop" for a
    /// path-only segment.
    pub op: String,
    /// Destination screen name; also the path segment it contributes.
    #[serde(default)]
    pub screen: Option<String>,
    /// Screen type identifier (default: "Screen").
    #[serde(default)]
    pub kind: Option<String>,
    /// Capture pattern; the screen becomes parameterized by the segment.
    #[serde(default)]
    pub capture: Option<String>,
    /// Capture label (default: the screen name).
    #[serde(default)]
    pub label: Option<String>,
    /// Explicit source screen name.
    #[serde(default)]
    pub source: Option<String>,
}

pub(crate) const DEFAULT_SCREEN_KIND: &str = "Screen";
pub(crate) const PROP_OP: &str = "prop";
