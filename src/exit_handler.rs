//! Exit code logic for the followgraph process.
//!
//! Single responsibility: map report success/failure counts to the process exit outcome.

use std::process::ExitCode;

/// Process exit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Every report was written.
    Success,
    /// Some reports were written, some failed.
    Partial,
    /// Analysis failed or no report could be written.
    Failure,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Partial => 2,
        }
    }
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        ExitCode::from(exit.code())
    }
}

/// Determines the process exit outcome from written and failed report counts.
pub(crate) fn determine_exit_outcome(written: usize, failed: usize) -> ProcessExit {
    if failed == 0 {
        ProcessExit::Success
    } else if written > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}
