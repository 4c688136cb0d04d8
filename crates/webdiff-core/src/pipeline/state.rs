//! Run states, in the order a successful run visits them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    EnvironmentsResolved,
    UrlsLoaded,
    ScenariosBuilt,
    ReferencePhase,
    TestPhase,
    Done,
    Failed,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineState::Init => "init",
            PipelineState::EnvironmentsResolved => "environments_resolved",
            PipelineState::UrlsLoaded => "urls_loaded",
            PipelineState::ScenariosBuilt => "scenarios_built",
            PipelineState::ReferencePhase => "reference_phase",
            PipelineState::TestPhase => "test_phase",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        }
    }

    /// True once the run can no longer make progress.
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
