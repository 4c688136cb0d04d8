//! Screenshot engine interface.
//!
//! The pipeline only depends on the [`Engine`] trait and does not know how
//! the engine is started. [`BackstopCommand`] runs the BackstopJS CLI.

mod command;

pub use command::BackstopCommand;

use std::fmt;
use std::future::Future;

use crate::scenario::BackstopConfig;

/// The two engine phases, always run in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Capture baseline screenshots from the reference environment.
    Reference,
    /// Capture screenshots from the test environment and compare them.
    Test,
}

impl Phase {
    /// Engine subcommand name.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Reference => "reference",
            Phase::Test => "test",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that can run an engine phase over a full config.
///
/// The config is only borrowed; implementations must not keep it past the call.
pub trait Engine {
    fn run_phase(
        &self,
        phase: Phase,
        config: &BackstopConfig,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}
