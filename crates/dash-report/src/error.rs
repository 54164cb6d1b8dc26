//! Error types for report recording.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Error returned by a report step handler.
pub type StepError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of a report step handler.
pub type StepResult = std::result::Result<(), StepError>;

/// Errors that can occur while recording a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Markup authoring error.
    #[error(transparent)]
    Markup(#[from] dash_markup::MarkupError),

    /// Arguments did not fit a step's signature, or an argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No step registered under this name.
    #[error("unknown report step '{0}'")]
    UnknownStep(String),

    /// A step with this name is already registered.
    #[error("report step '{0}' registered twice")]
    DuplicateStep(String),

    /// A step body failed. Only surfaced for pass-through calls or when the
    /// failure policy asks for propagation.
    #[error("report step '{step}' failed: {message}")]
    InstrumentedCallFailure { step: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
