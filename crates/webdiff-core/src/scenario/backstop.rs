//! The engine configuration document (`backstop.json`).

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ConfigurationError, InputError, WebdiffError};

use super::Scenario;

/// Engine config: the `defaultScenario` template, the optional
/// `onBeforeScript` hook, generated scenarios, and every other field verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct BackstopConfig {
    #[serde(rename = "defaultScenario")]
    pub default_scenario: Map<String, Value>,
    #[serde(rename = "onBeforeScript", skip_serializing_if = "Option::is_none")]
    pub on_before_script: Option<String>,
    pub scenarios: Vec<Scenario>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BackstopConfig {
    /// Builds the config from a parsed JSON document.
    ///
    /// `source` only names the file in error messages. Any `scenarios` already
    /// present in the document are dropped; the pipeline generates its own.
    pub fn from_value(doc: Value, source: &Path) -> Result<Self, ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidConfig {
            path: source.to_path_buf(),
            reason: reason.to_string(),
        };

        let mut root = match doc {
            Value::Object(map) => map,
            _ => return Err(invalid("top level must be a JSON object")),
        };

        let default_scenario = match root.remove("defaultScenario") {
            Some(Value::Object(map)) => map,
            None | Some(Value::Null) => {
                return Err(ConfigurationError::MissingDefaultScenario {
                    path: source.to_path_buf(),
                })
            }
            Some(_) => return Err(invalid("defaultScenario must be an object")),
        };

        let on_before_script = match root.remove("onBeforeScript") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s),
            Some(_) => return Err(invalid("onBeforeScript must be a string")),
        };

        if let Some(existing) = root.remove("scenarios") {
            let count = existing.as_array().map_or(0, Vec::len);
            tracing::debug!(count, "replacing scenarios declared in {}", source.display());
        }

        Ok(Self {
            default_scenario,
            on_before_script,
            scenarios: Vec::new(),
            extra: root,
        })
    }

    /// Parses the config from JSON text.
    pub fn from_json(text: &str, source: &Path) -> Result<Self, ConfigurationError> {
        let doc: Value =
            serde_json::from_str(text).map_err(|e| ConfigurationError::InvalidConfig {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::from_value(doc, source)
    }

    /// Reads and parses the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, WebdiffError> {
        let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        Ok(Self::from_json(&text, path)?)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
