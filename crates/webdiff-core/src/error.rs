//! Error taxonomy for a webdiff run.
//!
//! Configuration and input errors are raised before any engine phase starts;
//! phase errors come back from the engine. Malformed URL lines are not errors
//! at all: they are reported through [`crate::url_model::UrlList::rejected`].

use std::path::PathBuf;

use crate::engine::Phase;

/// Pre-flight configuration problems. No scenario is built when one occurs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("please make sure to provide a valid url for --{env}-env (got {value:?})")]
    InvalidEnvironment { env: &'static str, value: String },

    #[error("please make sure there is a defaultScenario in '{}'", path.display())]
    MissingDefaultScenario { path: PathBuf },

    #[error(
        "--headers was given but the engine config already defines onBeforeScript ({existing}); \
         require the header script from your own onBefore script instead"
    )]
    HeaderHookConflict { existing: String },

    #[error("cannot skip both the reference and the test phase")]
    BothPhasesSkipped,

    #[error("invalid engine config '{}': {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },
}

/// Problems with the URL list or the headers file.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("the file {} does not exist", path.display())]
    MissingUrlFile { path: PathBuf },

    #[error("no valid urls found")]
    NoValidUrls,

    #[error("invalid headers file '{}': {reason}", path.display())]
    InvalidHeaders { path: PathBuf, reason: String },

    #[error("read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any fatal error of a run.
#[derive(Debug, thiserror::Error)]
pub enum WebdiffError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("{phase} phase failed: {reason}")]
    Phase { phase: Phase, reason: String },
}

pub type Result<T> = std::result::Result<T, WebdiffError>;
