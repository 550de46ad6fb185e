//! Traced operations.
//!
//! The handle does not know how operations are observed. It describes the
//! unit of work with [`OperationDetails`] and hands an action to an
//! [`OperationExecutor`], which runs it synchronously, records the outcome
//! and returns the action's result unchanged.

mod recording;
mod tracing_executor;

pub use recording::{OperationOutcome, OperationRecord, RecordingOperationExecutor};
pub use tracing_executor::TracingOperationExecutor;

use crate::error::ResolveError;

/// Description of one traced operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDetails {
    /// Human-readable progress text, e.g. `Resolve artifact lib-1.0.jar (lib:1.0)`.
    pub display_name: String,
    /// Short grouping name, e.g. `Resolve artifact lib`.
    pub name: String,
    /// Identifier of the subject the operation acts on.
    pub descriptor: Option<String>,
}

impl OperationDetails {
    pub fn display_name(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            name: display_name.clone(),
            display_name,
            descriptor: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = Some(descriptor.into());
        self
    }
}

/// Runs actions as traced operations.
///
/// Implementations must call `action` exactly once, on the calling thread,
/// and return its error without altering it.
pub trait OperationExecutor: Send + Sync {
    fn run(
        &self,
        details: &OperationDetails,
        action: &mut dyn FnMut() -> Result<(), ResolveError>,
    ) -> Result<(), ResolveError>;
}

/// Executor that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UntracedOperationExecutor;

impl OperationExecutor for UntracedOperationExecutor {
    fn run(
        &self,
        _details: &OperationDetails,
        action: &mut dyn FnMut() -> Result<(), ResolveError>,
    ) -> Result<(), ResolveError> {
        action()
    }
}
