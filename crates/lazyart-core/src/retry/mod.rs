//! Retry and backoff for resolution closures.
//!
//! A handle never retries on its own. Closures that fetch or copy files can
//! opt in by wrapping their work with [`run_with_retry`] (see
//! [`crate::source::retrying`]), which classifies [`ResolveError`]s into
//! transient and permanent failures and backs off exponentially.
//!
//! [`ResolveError`]: crate::error::ResolveError

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_io_error};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
