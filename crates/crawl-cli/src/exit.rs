//! Process exit codes.

use crawl_engine::StopReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitStatus {
    /// Frontier exhausted or iteration ceiling reached.
    Success = 0,
    /// A round failed; partial results were written.
    Partial = 1,
    /// Configuration, start-node or output setup failed before any round ran.
    Setup = 2,
    /// Interrupted by the operator; partial results were written.
    Interrupted = 130,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<&StopReason> for ExitStatus {
    fn from(reason: &StopReason) -> Self {
        match reason {
            StopReason::FrontierExhausted | StopReason::IterationCeiling => Self::Success,
            StopReason::Cancelled => Self::Interrupted,
            StopReason::Failed(_) => Self::Partial,
        }
    }
}
