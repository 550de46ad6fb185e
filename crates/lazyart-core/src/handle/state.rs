//! Resolution state of a handle and what happens to it on failure.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::ResolveError;

/// Deferred resolution closure. Called at most once per successful
/// resolution; more than once only when a failed attempt is retried.
pub type ResolveFn = Box<dyn FnMut() -> Result<PathBuf, ResolveError> + Send>;

/// What a handle does with its closure after the closure fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep the closure; the next `file()` call tries again.
    #[default]
    Retain,
    /// Drop the closure; every later `file()` call fails with
    /// [`ResolveError::Abandoned`].
    Release,
}

/// Mutable part of a handle. Transitions only move forward:
/// `Unresolved -> Resolved` or `Unresolved -> Abandoned`.
pub(crate) enum Resolution {
    Unresolved(ResolveFn),
    Resolved(PathBuf),
    Abandoned,
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Unresolved(_) => f.write_str("Unresolved"),
            Resolution::Resolved(path) => f.debug_tuple("Resolved").field(path).finish(),
            Resolution::Abandoned => f.write_str("Abandoned"),
        }
    }
}
