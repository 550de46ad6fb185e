//! Lazily resolved, memoized artifact handles.
//!
//! An [`ArtifactHandle`] names an artifact of a module version and defers
//! producing its file until someone asks for it. Resolution runs once, as a
//! traced operation, and the result is cached for the handle's lifetime.

pub mod config;
pub mod logging;

pub mod attributes;
pub mod checksum;
pub mod descriptor;
pub mod error;
pub mod handle;
pub mod identity;
pub mod operation;
pub mod retry;
pub mod source;
pub mod task;

pub use attributes::{AttributesFactory, DefaultAttributesFactory, ImmutableAttributes};
pub use descriptor::ArtifactName;
pub use error::{AttributeError, IdentityError, ResolveError};
pub use handle::{ArtifactHandle, FailurePolicy, HandleServices, ResolveFn};
pub use identity::{ArtifactKey, ComponentArtifactId, ModuleVersionId, ResolvedModuleVersion};
pub use operation::{
    OperationDetails, OperationExecutor, RecordingOperationExecutor, TracingOperationExecutor,
};
pub use task::{Buildable, TaskDependency};
