//! Error surface of the hierarchy engine.
//!
//! Almost everything that can go wrong here is recovered locally:
//! unresolvable supertype references become missing-type records, malformed
//! cycles are tolerated by visited-set guards, and region misuse is a
//! defined no-op. What remains is cancellation, which must unwind a build
//! without publishing a partial graph.

use thiserror::Error;

/// Errors that can abort a hierarchy build.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// The caller's [`Cancellation`](crate::resolve::Cancellation) signal
    /// fired; no graph was published and any previously cached graph is
    /// untouched.
    #[error("type hierarchy build cancelled")]
    Cancelled,
}

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;
