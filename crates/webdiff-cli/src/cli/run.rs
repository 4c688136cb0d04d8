//! `webdiff --urls <file> ...` – build scenarios and run the engine phases.

use std::io::Write;

use anyhow::{Context, Result};
use webdiff_core::config::WebdiffConfig;
use webdiff_core::engine::BackstopCommand;
use webdiff_core::headers::load_headers;
use webdiff_core::pipeline::{Pipeline, PreparedRun};
use webdiff_core::scenario::BackstopConfig;

use super::Cli;

/// Runs one comparison. Status lines go to stderr; `out` only receives the
/// engine config JSON of a `--dry-run`.
pub async fn run_compare<W: Write>(args: &Cli, cfg: &WebdiffConfig, out: &mut W) -> Result<()> {
    let mut pipeline = Pipeline::new(args.run_options(cfg));
    pipeline.resolve_environments()?;

    let config_path = args.backstop_config_path(cfg);
    let backstop = BackstopConfig::load(&config_path)?;
    let headers = match &args.headers {
        Some(path) => load_headers(path)?,
        None => None,
    };

    let prepared = pipeline.prepare(backstop, headers)?;
    for line in status_lines(&prepared, args.verbose) {
        eprintln!("{line}");
    }

    if args.dry_run {
        let json = prepared
            .config
            .to_json_pretty()
            .context("serialize engine config")?;
        writeln!(out, "{json}").context("write engine config")?;
        return Ok(());
    }

    let engine = BackstopCommand::new(args.engine_command(cfg))?;
    pipeline.run_phases(&engine, &prepared).await?;
    tracing::info!(state = %pipeline.state(), "run finished");
    Ok(())
}

/// Human-readable summary of a prepared run; dropped lines only when `verbose`.
pub fn status_lines(prepared: &PreparedRun, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if verbose {
        lines.extend(
            prepared
                .rejected
                .iter()
                .map(|(line, _)| format!("Removing invalid URL: \"{line}\"")),
        );
    }
    lines.push(format!(
        "Generated {} scenario(s).",
        prepared.config.scenarios.len()
    ));
    lines
}
