//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::error::ResolveError;

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
/// The last error is returned unchanged.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, ResolveError>
where
    F: FnMut() -> Result<T, ResolveError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(
                            attempt,
                            ?kind,
                            delay_ms = d.as_millis() as u64,
                            "retrying after error: {}",
                            e
                        );
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Duration;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn transient_errors_are_retried_until_success() {
        let mut calls = 0;
        let out = run_with_retry(&fast_policy(5), || {
            calls += 1;
            if calls < 3 {
                Err(ResolveError::io(
                    "/tmp/a",
                    io::Error::new(io::ErrorKind::TimedOut, "slow"),
                ))
            } else {
                Ok(calls)
            }
        })
        .unwrap();
        assert_eq!(out, 3);
    }

    #[test]
    fn permanent_errors_are_not_retried() {
        let mut calls = 0;
        let err = run_with_retry(&fast_policy(5), || -> Result<(), ResolveError> {
            calls += 1;
            Err(ResolveError::Missing("a.jar".into()))
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, ResolveError::Missing(_)));
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let err = run_with_retry(&fast_policy(3), || -> Result<(), ResolveError> {
            calls += 1;
            Err(ResolveError::io(
                "/tmp/a",
                io::Error::new(io::ErrorKind::ConnectionReset, "reset"),
            ))
        })
        .unwrap_err();
        assert_eq!(calls, 3);
        assert!(matches!(err, ResolveError::Io { .. }));
    }
}
