//! Engine phases as a child process (`backstop reference|test --config=<file>`).

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::process::Command;

use crate::scenario::BackstopConfig;

use super::{Engine, Phase};

/// Runs the engine CLI once per phase with the merged config written to a
/// temporary JSON file.
#[derive(Debug, Clone)]
pub struct BackstopCommand {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl BackstopCommand {
    /// `command` is split on whitespace: the first word is the program, the
    /// rest are leading arguments (e.g. `"npx backstop"`).
    pub fn new(command: &str) -> Result<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .with_context(|| format!("engine command is empty: {command:?}"))?;
        Ok(Self {
            program,
            args: words.collect(),
            working_dir: None,
        })
    }

    /// Directory the engine runs in; defaults to the current directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn write_config(config: &BackstopConfig) -> Result<tempfile::NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("webdiff-backstop-")
            .suffix(".json")
            .tempfile()
            .context("create temporary engine config")?;
        let json = config.to_json_pretty().context("serialize engine config")?;
        file.write_all(json.as_bytes())
            .context("write temporary engine config")?;
        file.flush().context("flush temporary engine config")?;
        Ok(file)
    }
}

impl Engine for BackstopCommand {
    async fn run_phase(&self, phase: Phase, config: &BackstopConfig) -> Result<()> {
        // Kept alive until the child exits.
        let config_file = Self::write_config(config)?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(phase.as_str())
            .arg(format!("--config={}", config_file.path().display()));
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        tracing::info!(
            program = %self.program,
            %phase,
            scenarios = config.scenarios.len(),
            "starting engine phase"
        );
        let status = cmd
            .status()
            .await
            .with_context(|| format!("spawn engine {:?}", self.program))?;
        if !status.success() {
            anyhow::bail!("engine exited with {status}");
        }
        tracing::info!(%phase, "engine phase completed");
        Ok(())
    }
}
