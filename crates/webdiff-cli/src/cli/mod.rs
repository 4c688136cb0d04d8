//! CLI for webdiff: compare page screenshots between two environments.

mod run;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use webdiff_core::config::{self, WebdiffConfig};
use webdiff_core::pipeline::{PhasePolicy, RunOptions};

use run::run_compare;

/// Given a list of URLs and two environments, compares screenshots across
/// the environments using BackstopJS.
#[derive(Debug, Parser)]
#[command(name = "webdiff", version)]
#[command(about = "Compare page screenshots between two environments using BackstopJS", long_about = None)]
pub struct Cli {
    /// File containing the list of URLs to load, one per line.
    #[arg(long, value_name = "FILE")]
    pub urls: PathBuf,

    /// The test environment, e.g. a staging site: --test-env http://staging.example.com
    #[arg(long, value_name = "URL", required_unless_present = "skip_test")]
    pub test_env: Option<String>,

    /// The reference environment, e.g. production: --reference-env http://example.com
    #[arg(long, value_name = "URL", required_unless_present = "skip_reference")]
    pub reference_env: Option<String>,

    /// Skip creating references. Speeds up subsequent test runs.
    #[arg(long)]
    pub skip_reference: bool,

    /// Skip running the tests. Use this to create or regenerate references.
    #[arg(long)]
    pub skip_test: bool,

    /// JSON file of extra request headers sent on every page request.
    #[arg(long, value_name = "FILE")]
    pub headers: Option<PathBuf>,

    /// Engine config holding defaultScenario (default from config.toml, usually ./backstop.json).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Engine command to run for each phase (overrides config.toml).
    #[arg(long, value_name = "CMD")]
    pub engine: Option<String>,

    /// Report every URL line dropped as invalid.
    #[arg(short, long)]
    pub verbose: bool,

    /// Run the test phase even if the reference phase fails.
    #[arg(long)]
    pub independent_phases: bool,

    /// Print the generated engine config instead of running the engine.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        run_compare(&cli, &cfg, &mut std::io::stdout()).await
    }

    /// Pipeline options from flags, with config.toml filling the rest.
    pub fn run_options(&self, cfg: &WebdiffConfig) -> RunOptions {
        let mut opts = RunOptions::new(&self.urls);
        opts.reference_env = self.reference_env.clone();
        opts.test_env = self.test_env.clone();
        opts.skip_reference = self.skip_reference;
        opts.skip_test = self.skip_test;
        opts.verbose = self.verbose;
        opts.label_max_len = cfg.label_max_len;
        opts.header_script = cfg.header_script.clone();
        opts.policy = if self.independent_phases {
            PhasePolicy::Independent
        } else {
            PhasePolicy::Chained
        };
        opts
    }

    pub fn backstop_config_path(&self, cfg: &WebdiffConfig) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| cfg.backstop_config.clone())
    }

    pub fn engine_command<'a>(&'a self, cfg: &'a WebdiffConfig) -> &'a str {
        self.engine.as_deref().unwrap_or(&cfg.engine_command)
    }
}

#[cfg(test)]
mod tests;
