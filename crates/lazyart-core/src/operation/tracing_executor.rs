//! Executor that reports operations through `tracing` spans.

use std::time::Instant;

use super::{OperationDetails, OperationExecutor};
use crate::error::ResolveError;

/// Wraps each action in an `operation` span; the outcome is logged inside
/// the span before the result leaves it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOperationExecutor;

impl OperationExecutor for TracingOperationExecutor {
    fn run(
        &self,
        details: &OperationDetails,
        action: &mut dyn FnMut() -> Result<(), ResolveError>,
    ) -> Result<(), ResolveError> {
        let span = tracing::info_span!(
            "operation",
            name = %details.name,
            descriptor = details.descriptor.as_deref().unwrap_or(""),
        );
        let _enter = span.enter();
        tracing::debug!("{} started", details.display_name);

        let started = Instant::now();
        let result = action();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(()) => tracing::debug!(elapsed_ms, "{} completed", details.display_name),
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "{} failed", details.display_name),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between the subscriber and the assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn runs_action_once_and_returns_its_result() {
        let mut calls = 0;
        let details = OperationDetails::display_name("Resolve artifact a");
        TracingOperationExecutor
            .run(&details, &mut || {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn failure_passes_through_unchanged() {
        let details = OperationDetails::display_name("Resolve artifact a");
        let err = TracingOperationExecutor
            .run(&details, &mut || Err(ResolveError::Build(":a:jar".into())))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Build(ref t) if t == ":a:jar"));
    }

    #[test]
    fn failure_is_logged_inside_the_operation_span() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let details = OperationDetails::display_name("Resolve artifact lib-1.0.jar (lib:1.0)")
            .name("Resolve artifact lib")
            .descriptor("lib-1.0.jar (lib:1.0)");

        let result = tracing::subscriber::with_default(subscriber, || {
            TracingOperationExecutor.run(&details, &mut || {
                Err(ResolveError::Missing("/build/lib-1.0.jar".into()))
            })
        });
        assert!(matches!(result, Err(ResolveError::Missing(_))));

        let out = logs.contents();
        let failed = out
            .lines()
            .find(|l| l.contains("Resolve artifact lib-1.0.jar (lib:1.0) failed"))
            .unwrap_or_else(|| panic!("no failure event in:\n{out}"));
        assert!(failed.contains("WARN"), "{failed}");
        assert!(failed.contains("operation{"), "{failed}");
        assert!(failed.contains("name=Resolve artifact lib"), "{failed}");
        assert!(failed.contains("artifact not found: /build/lib-1.0.jar"), "{failed}");
    }
}
