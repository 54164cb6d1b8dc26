//! Error types for markup construction.

use thiserror::Error;

/// Result type for markup operations.
pub type Result<T> = std::result::Result<T, MarkupError>;

/// Errors that can occur while authoring a markup tree.
///
/// Rendering itself never fails. Escaping happens in the authoring calls
/// that take user text: `text` and `title` on a [`Canvas`](crate::Canvas),
/// plus the page title and `add_meta` on the document. Content handed to
/// raw insertion paths (`table`, `code`, raw text children) is trusted
/// as-is, so a malformed fragment there corrupts the output without being
/// reported.
#[derive(Error, Debug)]
pub enum MarkupError {
    /// An authoring argument was outside its accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An artifact could not be encoded for inline embedding.
    #[error("failed to encode {kind} artifact: {reason}")]
    Encode { kind: String, reason: String },
}
