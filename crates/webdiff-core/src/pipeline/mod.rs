//! Run orchestration: resolve environments, load URLs, build scenarios, then
//! run the reference and test phases in that order.
//!
//! Every validation happens in [`Pipeline::prepare`], before any engine phase
//! starts, so the engine never sees a partial scenario set.

mod state;

pub use state::PipelineState;

use std::path::PathBuf;

use crate::engine::{Engine, Phase};
use crate::error::{ConfigurationError, Result, WebdiffError};
use crate::headers::{install_header_hook, Headers, DEFAULT_HEADER_SCRIPT};
use crate::label::DEFAULT_LABEL_MAX_LEN;
use crate::scenario::{BackstopConfig, ScenarioBuilder};
use crate::url_model::{read_urls, sanitize_env_url};

/// What happens to the test phase when the reference phase fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhasePolicy {
    /// Reference failure aborts the run; the test phase never starts.
    #[default]
    Chained,
    /// Both phases are attempted one after the other; the first failure is
    /// reported once both are done.
    Independent,
}

/// Inputs of one run, as collected by the CLI.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub urls_file: PathBuf,
    pub reference_env: Option<String>,
    pub test_env: Option<String>,
    pub skip_reference: bool,
    pub skip_test: bool,
    pub verbose: bool,
    pub label_max_len: usize,
    pub header_script: String,
    pub policy: PhasePolicy,
}

impl RunOptions {
    pub fn new(urls_file: impl Into<PathBuf>) -> Self {
        Self {
            urls_file: urls_file.into(),
            reference_env: None,
            test_env: None,
            skip_reference: false,
            skip_test: false,
            verbose: false,
            label_max_len: DEFAULT_LABEL_MAX_LEN,
            header_script: DEFAULT_HEADER_SCRIPT.to_string(),
            policy: PhasePolicy::default(),
        }
    }
}

/// Sanitized origins; `None` for a skipped environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environments {
    pub reference: Option<String>,
    pub test: Option<String>,
}

/// A fully validated run, ready to hand to the engine.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub environments: Environments,
    /// Engine config with `scenarios` filled in.
    pub config: BackstopConfig,
    /// URL lines dropped as invalid, with the reason.
    pub rejected: Vec<(String, String)>,
}

/// Drives one run through [`PipelineState`].
#[derive(Debug)]
pub struct Pipeline {
    options: RunOptions,
    state: PipelineState,
    environments: Option<Environments>,
}

impl Pipeline {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            state: PipelineState::Init,
            environments: None,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn advance(&mut self, next: PipelineState) {
        tracing::debug!(from = %self.state, to = %next, "pipeline transition");
        self.state = next;
    }

    fn fail<T>(&mut self, err: impl Into<WebdiffError>) -> Result<T> {
        let err = err.into();
        tracing::error!(state = %self.state, "run failed: {err}");
        self.state = PipelineState::Failed;
        Err(err)
    }

    /// Validates the skip flags and sanitizes both environment URLs.
    ///
    /// Safe to call more than once; later calls return the cached result.
    pub fn resolve_environments(&mut self) -> Result<Environments> {
        if let Some(envs) = &self.environments {
            return Ok(envs.clone());
        }
        if self.options.skip_reference && self.options.skip_test {
            return self.fail(ConfigurationError::BothPhasesSkipped);
        }

        let reference = if self.options.skip_reference {
            None
        } else {
            match sanitize_origin("reference", self.options.reference_env.as_deref()) {
                Ok(origin) => Some(origin),
                Err(e) => return self.fail(e),
            }
        };
        let test = if self.options.skip_test {
            None
        } else {
            match sanitize_origin("test", self.options.test_env.as_deref()) {
                Ok(origin) => Some(origin),
                Err(e) => return self.fail(e),
            }
        };

        let envs = Environments { reference, test };
        tracing::info!(reference = ?envs.reference, test = ?envs.test, "environments resolved");
        self.environments = Some(envs.clone());
        self.advance(PipelineState::EnvironmentsResolved);
        Ok(envs)
    }

    /// Loads the URL list and builds one scenario per surviving page into
    /// `config`. When `headers` is given the header hook is installed first;
    /// a conflicting hook fails the run before any scenario is built.
    pub fn prepare(
        &mut self,
        mut config: BackstopConfig,
        headers: Option<Headers>,
    ) -> Result<PreparedRun> {
        let envs = self.resolve_environments()?;

        if headers.is_some() {
            if let Err(e) = install_header_hook(&mut config, &self.options.header_script) {
                return self.fail(e);
            }
        }

        let list = match read_urls(&self.options.urls_file, self.options.verbose) {
            Ok(list) => list,
            Err(e) => return self.fail(e),
        };
        self.advance(PipelineState::UrlsLoaded);

        let paths = list.paths();
        let test_origin = envs.test.as_deref().unwrap_or("");
        let reference_origin = envs.reference.as_deref().unwrap_or("");
        let scenarios =
            ScenarioBuilder::new(&config.default_scenario, test_origin, reference_origin)
                .headers(headers.as_ref())
                .label_max_len(self.options.label_max_len)
                .build_all(&paths);
        tracing::info!(count = scenarios.len(), "scenarios built");
        config.scenarios = scenarios;
        self.advance(PipelineState::ScenariosBuilt);

        Ok(PreparedRun {
            environments: envs,
            config,
            rejected: list.rejected,
        })
    }

    /// Runs the non-skipped phases, reference first. Call after [`Pipeline::prepare`].
    pub async fn run_phases<E: Engine>(&mut self, engine: &E, run: &PreparedRun) -> Result<()> {
        let mut first_error = None;

        if !self.options.skip_reference {
            self.advance(PipelineState::ReferencePhase);
            if let Err(e) = run_one(engine, Phase::Reference, &run.config).await {
                match self.options.policy {
                    PhasePolicy::Chained => return self.fail(e),
                    PhasePolicy::Independent => {
                        tracing::warn!("{e}; running test phase anyway");
                        first_error = Some(e);
                    }
                }
            }
        }

        if !self.options.skip_test {
            self.advance(PipelineState::TestPhase);
            if let Err(e) = run_one(engine, Phase::Test, &run.config).await {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => self.fail(e),
            None => {
                self.advance(PipelineState::Done);
                Ok(())
            }
        }
    }

    /// `prepare` followed by `run_phases`.
    pub async fn run<E: Engine>(
        &mut self,
        engine: &E,
        config: BackstopConfig,
        headers: Option<Headers>,
    ) -> Result<PreparedRun> {
        let prepared = self.prepare(config, headers)?;
        self.run_phases(engine, &prepared).await?;
        Ok(prepared)
    }
}

fn sanitize_origin(
    env: &'static str,
    value: Option<&str>,
) -> std::result::Result<String, ConfigurationError> {
    let value = value.unwrap_or_default();
    match sanitize_env_url(value) {
        Some(origin) if !origin.is_empty() => Ok(origin),
        _ => Err(ConfigurationError::InvalidEnvironment {
            env,
            value: value.to_string(),
        }),
    }
}

async fn run_one<E: Engine>(engine: &E, phase: Phase, config: &BackstopConfig) -> Result<()> {
    engine
        .run_phase(phase, config)
        .await
        .map_err(|e| WebdiffError::Phase {
            phase,
            reason: format!("{e:#}"),
        })
}
