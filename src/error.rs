//! Error types for the memokit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when a memo is built without its required
//!   collaborators (e.g. no computation was supplied to the builder).
//! - [`InvariantError`]: Returned when internal counter/store invariants are
//!   violated (see [`Memo::check_invariants`](crate::memo::Memo::check_invariants)).
//!
//! Errors raised by the memoized computation itself are never wrapped: they
//! are the caller's own error type and propagate out of
//! [`Memo::try_invoke`](crate::memo::Memo::try_invoke) unchanged.
//!
//! ## Example Usage
//!
//! ```
//! use memokit::builder::MemoBuilder;
//! use memokit::error::ConfigError;
//!
//! // A builder without a computation fails fast
//! let err: ConfigError = MemoBuilder::<u64, u64>::new().build().unwrap_err();
//! assert!(err.message().contains("computation"));
//!
//! let memo = MemoBuilder::<u64, u64>::new().compute(|n| n * n).build();
//! assert!(memo.is_ok());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal memo invariants are violated.
///
/// Produced by [`Memo::check_invariants`](crate::memo::Memo::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when a memo cannot be constructed.
///
/// Produced by [`MemoBuilder::build`](crate::builder::MemoBuilder::build)
/// when a required collaborator is missing. Carries a human-readable
/// description of what was missing.
///
/// # Example
///
/// ```
/// use memokit::builder::MemoBuilder;
///
/// let err = MemoBuilder::<u64, u64>::new().build().unwrap_err();
/// assert!(err.to_string().contains("computation"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
