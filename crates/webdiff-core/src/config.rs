use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::headers::DEFAULT_HEADER_SCRIPT;
use crate::label::DEFAULT_LABEL_MAX_LEN;

/// Tool configuration loaded from `~/.config/webdiff/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebdiffConfig {
    /// Program run for each engine phase, as `<engine_command> <phase> --config=<file>`.
    pub engine_command: String,
    /// Maximum scenario label length in characters.
    pub label_max_len: usize,
    /// Engine config file holding `defaultScenario`, relative to the working directory.
    pub backstop_config: PathBuf,
    /// Hook script set as `onBeforeScript` when `--headers` is given.
    pub header_script: String,
}

impl Default for WebdiffConfig {
    fn default() -> Self {
        Self {
            engine_command: "backstop".to_string(),
            label_max_len: DEFAULT_LABEL_MAX_LEN,
            backstop_config: PathBuf::from("backstop.json"),
            header_script: DEFAULT_HEADER_SCRIPT.to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("webdiff")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WebdiffConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WebdiffConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: WebdiffConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
