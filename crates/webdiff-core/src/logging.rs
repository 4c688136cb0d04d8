//! Run log: the XDG state file when it can be opened, stderr otherwise.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,webdiff=debug,webdiff_core=debug";

/// Where log events end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Path of the run log: `~/.local/state/webdiff/webdiff.log` (parent dir is created).
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("webdiff")?;
    Ok(xdg_dirs.place_state_file("webdiff.log")?)
}

/// Opens `path` for appending, creating it and its parent dirs.
fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber for `target`. Fails if the log file cannot
/// be opened or a subscriber is already installed.
pub fn init(target: &LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false);
    let installed = match target {
        LogTarget::File(path) => {
            let file =
                open_append(path).with_context(|| format!("open log {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))
}

/// Logs to the XDG state file, falling back to stderr when the state dir is
/// unusable. Returns the target actually in use.
pub fn init_default() -> LogTarget {
    let file_target = log_path().map(LogTarget::File);
    if let Ok(target) = &file_target {
        if init(target).is_ok() {
            tracing::info!(?target, "webdiff logging initialized");
            return target.clone();
        }
    }
    let _ = init(&LogTarget::Stderr);
    LogTarget::Stderr
}
