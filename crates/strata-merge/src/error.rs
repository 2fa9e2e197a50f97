//! Error types for the merge crate.

use crate::kind::Kind;

/// Errors raised by the merge engine itself.
///
/// Hook implementations choose their own error type; it must implement
/// `From<MergeError>` so engine failures travel through the same channel
/// while hook failures reach the caller untouched.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// An object source was applied onto a root that is not an object.
    #[error("merge target must be an object, got {kind}")]
    TargetNotObject { kind: Kind },

    /// A name did not match any registered array merge policy.
    #[error("unknown array merge policy: {0}")]
    UnknownArrayPolicy(String),

    /// A substituted session result did not have the expected shape.
    #[error("malformed merge report: {0}")]
    MalformedReport(String),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
