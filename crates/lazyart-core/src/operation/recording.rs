//! In-memory record of executed operations.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::{OperationDetails, OperationExecutor, UntracedOperationExecutor};
use crate::error::ResolveError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Succeeded,
    /// Failed with the given error message.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub details: OperationDetails,
    pub outcome: OperationOutcome,
    pub elapsed: Duration,
}

/// Records every operation it runs, optionally delegating the actual run to
/// another executor (e.g. [`TracingOperationExecutor`](super::TracingOperationExecutor)).
///
/// Shared across threads; the record list is only locked around pushes, never
/// while an action runs.
pub struct RecordingOperationExecutor {
    inner: Arc<dyn OperationExecutor>,
    records: Mutex<Vec<OperationRecord>>,
}

impl Default for RecordingOperationExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingOperationExecutor {
    pub fn new() -> Self {
        Self::wrapping(Arc::new(UntracedOperationExecutor))
    }

    pub fn wrapping(inner: Arc<dyn OperationExecutor>) -> Self {
        Self {
            inner,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the operations recorded so far, in completion order.
    pub fn records(&self) -> Vec<OperationRecord> {
        self.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<OperationRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OperationExecutor for RecordingOperationExecutor {
    fn run(
        &self,
        details: &OperationDetails,
        action: &mut dyn FnMut() -> Result<(), ResolveError>,
    ) -> Result<(), ResolveError> {
        let started = Instant::now();
        let result = self.inner.run(details, action);
        let outcome = match &result {
            Ok(()) => OperationOutcome::Succeeded,
            Err(e) => OperationOutcome::Failed(e.to_string()),
        };
        self.lock().push(OperationRecord {
            details: details.clone(),
            outcome,
            elapsed: started.elapsed(),
        });
        result
    }
}
