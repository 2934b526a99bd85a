use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

use crate::config::types::{RouteFile, ScriptDef, StepDef, DEFAULT_SCREEN_KIND, PROP_OP};
use crate::narrative::{Capture, Scene, Script};
use crate::screen::ScreenDescriptor;
use crate::transition::TransitionOperator;

/// Errors that can occur when loading a route file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read route file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse route file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Route file validation failed: {message}")]
    ValidationError { message: String },
}

impl RouteFile {
    /// Returns the path to the route file.
    ///
    /// Uses `~/.config/stagecraft/routes.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("stagecraft").join("routes.toml")
    }

    /// Loads the default route file.
    ///
    /// - If the file doesn't exist, returns `RouteFile::default()`.
    /// - Otherwise reads, parses and validates it.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(RouteFile::default());
        }

        Self::load_from(&path)
    }

    /// Loads and validates the route file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let routes: RouteFile = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        routes.validate()?;
        Ok(routes)
    }

    /// Validates the route file.
    ///
    /// Checks:
    /// - Script names are non-empty and unique
    /// - Every script has at least one step
    /// - Every step names a known operator and has the fields it needs
    /// - Capture patterns compile
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for script in &self.scripts {
            if script.name.trim().is_empty() {
                return Err(invalid("Script name must not be empty".to_string()));
            }
            if !names.insert(script.name.as_str()) {
                return Err(invalid(format!("Duplicate script name '{}'", script.name)));
            }
            if script.steps.is_empty() {
                return Err(invalid(format!("Script '{}' has no steps", script.name)));
            }
            for (index, step) in script.steps.iter().enumerate() {
                step.validate()
                    .map_err(|message| invalid(format!("Script '{}' step {}: {}", script.name, index + 1, message)))?;
            }
        }
        Ok(())
    }

    /// Build the scripts this file declares, in file order.
    pub fn build_scripts(&self) -> Result<Vec<Script>, ConfigError> {
        self.validate()?;
        self.scripts.iter().map(ScriptDef::build).collect()
    }
}

impl ScriptDef {
    fn build(&self) -> Result<Script, ConfigError> {
        let mut script = Script::named(&self.name);
        for step in &self.steps {
            script.append(step.build(&self.name)?);
        }
        Ok(script)
    }
}

impl StepDef {
    fn operator(&self) -> Option<TransitionOperator> {
        TransitionOperator::from_name(&self.op)
    }

    fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(DEFAULT_SCREEN_KIND)
    }

    fn validate(&self) -> Result<(), String> {
        if self.op == PROP_OP {
            return match self.screen {
                Some(_) => Ok(()),
                None => Err("prop needs a screen name".to_string()),
            };
        }
        let Some(operator) = self.operator() else {
            return Err(format!("Unknown operator '{}'", self.op));
        };
        let needs_screen = !matches!(
            operator,
            TransitionOperator::None
                | TransitionOperator::Pop
                | TransitionOperator::PopToRoot
                | TransitionOperator::Dismiss
        );
        if needs_screen && self.screen.is_none() {
            return Err(format!("'{}' needs a screen", self.op));
        }
        if let Some(pattern) = &self.capture {
            if self.screen.is_none() {
                return Err("capture needs a screen name".to_string());
            }
            Regex::new(pattern).map_err(|e| format!("Invalid capture pattern '{pattern}': {e}"))?;
        }
        Ok(())
    }

    fn build(&self, script: &str) -> Result<Scene, ConfigError> {
        let screen = self.screen.clone().unwrap_or_default();
        if self.op == PROP_OP {
            return Ok(Scene::prop(screen));
        }

        let operator = self
            .operator()
            .ok_or_else(|| invalid(format!("Script '{script}': unknown operator '{}'", self.op)))?;
        let kind = self.kind().to_string();

        let scene = match (&self.capture, &self.screen) {
            (Some(pattern), Some(_)) => {
                let label = self.label.clone().unwrap_or_else(|| screen.clone());
                let capture = Capture::new(pattern, label, move |input| {
                    ScreenDescriptor::new(&kind, &screen).with_identity(format!("{screen}/{input}"))
                })
                .map_err(|e| invalid(format!("Script '{script}': {e}")))?;
                Scene::capture(operator, capture)
            }
            (_, Some(name)) => Scene::new(operator, Some(ScreenDescriptor::new(&kind, name))),
            (_, None) => Scene::new(operator, None),
        };

        Ok(match &self.source {
            Some(source) => scene.from(ScreenDescriptor::new(self.kind(), source)),
            None => scene,
        })
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::ValidationError { message }
}
