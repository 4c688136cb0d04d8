//! webdiff core: turns a list of page URLs into BackstopJS scenarios for two
//! environments and drives the engine's reference and test phases.

pub mod config;
pub mod engine;
pub mod error;
pub mod headers;
pub mod label;
pub mod logging;
pub mod pipeline;
pub mod scenario;
pub mod url_model;

pub use error::{ConfigurationError, InputError, WebdiffError};
