//! Exit codes for the dashboard CLI.
//!
//! - 0-1: the report was produced, possibly with propagated step failures
//! - 10-19: user/environment errors

use dash_report::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report written.
    Clean = 0,

    /// A step failed under the propagating failure policy.
    StepFailed = 1,

    /// Bad invocation or unknown step.
    ArgsError = 10,

    /// Configuration could not be loaded or is invalid.
    ConfigError = 11,

    /// Reading assets or writing the report failed.
    IoError = 12,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<&ReportError> for ExitCode {
    fn from(err: &ReportError) -> Self {
        match err {
            ReportError::InstrumentedCallFailure { .. } => ExitCode::StepFailed,
            ReportError::InvalidArgument(_)
            | ReportError::UnknownStep(_)
            | ReportError::DuplicateStep(_)
            | ReportError::Markup(_) => ExitCode::ArgsError,
            ReportError::InvalidConfig(_) | ReportError::Json(_) => ExitCode::ConfigError,
            ReportError::Io(_) => ExitCode::IoError,
        }
    }
}
