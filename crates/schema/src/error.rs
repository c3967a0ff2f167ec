//! Error types for the schema crate.

use thiserror::Error;

/// A category that is not part of the closed [`Category`](crate::Category) domain.
///
/// Both wire values and human-readable names can be unknown, so the error
/// keeps whichever form the caller supplied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnknownCategory {
    /// An `int32` on the wire that no variant is assigned to
    #[error("unknown category value {0}")]
    Value(i32),

    /// A name (CLI flag, query string) that does not parse
    #[error("unknown category `{0}` (expected one of: mystery, science-fiction, self-help)")]
    Name(String),
}
