//! Extra request headers sent with every page request.
//!
//! The engine applies them from its `onBeforeScript` hook, so supplying
//! headers claims that hook for the header script.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{ConfigurationError, InputError};
use crate::scenario::BackstopConfig;

/// Default engine hook script that installs `scenario.headers` on each request.
pub const DEFAULT_HEADER_SCRIPT: &str = "onBefore.js";

/// Header name to value.
pub type Headers = BTreeMap<String, String>;

/// Parses a headers document. `null` means no headers; otherwise it must be an
/// object whose values are strings (numbers and booleans are stringified).
pub fn parse_headers(doc: Value, source: &Path) -> Result<Option<Headers>, InputError> {
    let invalid = |reason: String| InputError::InvalidHeaders {
        path: source.to_path_buf(),
        reason,
    };

    let map = match doc {
        Value::Null => return Ok(None),
        Value::Object(map) => map,
        _ => return Err(invalid("expected a JSON object".to_string())),
    };

    let mut headers = Headers::new();
    for (name, value) in map {
        let value = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => return Err(invalid(format!("header {name:?} has non-scalar value {other}"))),
        };
        headers.insert(name, value);
    }
    Ok(Some(headers))
}

/// Reads and parses a headers JSON file.
pub fn load_headers(path: &Path) -> Result<Option<Headers>, InputError> {
    let bytes = std::fs::read(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_json::from_slice(&bytes).map_err(|e| InputError::InvalidHeaders {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_headers(doc, path)
}

/// Points the engine's `onBeforeScript` at the header script.
///
/// Fails if the config already declares its own hook; in that case the user's
/// hook has to require the header script itself.
pub fn install_header_hook(
    config: &mut BackstopConfig,
    script: &str,
) -> Result<(), ConfigurationError> {
    if let Some(existing) = &config.on_before_script {
        return Err(ConfigurationError::HeaderHookConflict {
            existing: existing.clone(),
        });
    }
    config.on_before_script = Some(script.to_string());
    tracing::debug!(script, "installed header hook");
    Ok(())
}
