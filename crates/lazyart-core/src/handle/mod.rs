//! Lazily resolved, memoized artifact handle.
//!
//! A handle is created either already resolved (a concrete path) or with a
//! deferred [`ResolveFn`]. The first [`ArtifactHandle::file`] call runs the
//! closure inside a traced operation, stores the path and drops the closure.
//! Every later call returns the stored path without tracing.
//!
//! The check, the closure call and the state transition run under a
//! per-handle mutex, so concurrent callers trigger at most one resolution and
//! all observe the same path. A closure must not call `file()` on its own
//! handle: the lock is not re-entrant. The resolved path is also published
//! outside the lock, so [`ArtifactHandle::is_resolved`],
//! [`ArtifactHandle::try_file`] and `Debug` never wait on a resolution in
//! progress and are safe to call from inside the closure.
//!
//! Identity is the [`ArtifactKey`] `(owner, artifact id)`. Descriptor,
//! attributes and resolution state are ignored by `Eq` and `Hash`.

mod state;

pub use state::{FailurePolicy, ResolveFn};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, TryLockError};

use crate::attributes::{AttributesFactory, DefaultAttributesFactory, ImmutableAttributes};
use crate::descriptor::ArtifactName;
use crate::error::{AttributeError, ResolveError};
use crate::identity::{ArtifactKey, ComponentArtifactId, ModuleVersionId, ResolvedModuleVersion};
use crate::operation::{OperationDetails, OperationExecutor};
use crate::task::{Buildable, TaskDependency};

use state::Resolution;

/// Collaborators shared by every handle a resolver creates.
#[derive(Clone)]
pub struct HandleServices {
    pub attributes: Arc<dyn AttributesFactory>,
    pub executor: Arc<dyn OperationExecutor>,
    pub failure_policy: FailurePolicy,
}

impl HandleServices {
    /// Default attribute derivation and [`FailurePolicy::Retain`].
    pub fn new(executor: Arc<dyn OperationExecutor>) -> Self {
        Self {
            attributes: Arc::new(DefaultAttributesFactory),
            executor,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_attributes_factory(mut self, attributes: Arc<dyn AttributesFactory>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

pub struct ArtifactHandle {
    key: ArtifactKey,
    descriptor: ArtifactName,
    attributes: ImmutableAttributes,
    build_dependencies: TaskDependency,
    executor: Arc<dyn OperationExecutor>,
    failure_policy: FailurePolicy,
    state: Mutex<Resolution>,
    /// Set once, together with `Resolution::Resolved`.
    resolved: OnceLock<PathBuf>,
}

impl ArtifactHandle {
    /// Handle whose file is produced by `source` on first access.
    pub fn deferred<F>(
        owner: ModuleVersionId,
        descriptor: ArtifactName,
        artifact_id: ComponentArtifactId,
        build_dependencies: TaskDependency,
        source: F,
        parent_attributes: Option<&ImmutableAttributes>,
        services: &HandleServices,
    ) -> Result<Self, AttributeError>
    where
        F: FnMut() -> Result<PathBuf, ResolveError> + Send + 'static,
    {
        Self::build(
            owner,
            descriptor,
            artifact_id,
            build_dependencies,
            Resolution::Unresolved(Box::new(source)),
            parent_attributes,
            services,
        )
    }

    /// Handle for a file that already exists; never traces or resolves.
    pub fn resolved(
        owner: ModuleVersionId,
        descriptor: ArtifactName,
        artifact_id: ComponentArtifactId,
        build_dependencies: TaskDependency,
        file: PathBuf,
        parent_attributes: Option<&ImmutableAttributes>,
        services: &HandleServices,
    ) -> Result<Self, AttributeError> {
        Self::build(
            owner,
            descriptor,
            artifact_id,
            build_dependencies,
            Resolution::Resolved(file),
            parent_attributes,
            services,
        )
    }

    fn build(
        owner: ModuleVersionId,
        descriptor: ArtifactName,
        artifact_id: ComponentArtifactId,
        build_dependencies: TaskDependency,
        state: Resolution,
        parent_attributes: Option<&ImmutableAttributes>,
        services: &HandleServices,
    ) -> Result<Self, AttributeError> {
        let attributes = services
            .attributes
            .for_artifact(&descriptor, parent_attributes)?;
        let resolved = OnceLock::new();
        if let Resolution::Resolved(path) = &state {
            let _ = resolved.set(path.clone());
        }
        Ok(Self {
            key: ArtifactKey::new(owner, artifact_id),
            descriptor,
            attributes,
            build_dependencies,
            executor: Arc::clone(&services.executor),
            failure_policy: services.failure_policy,
            state: Mutex::new(state),
            resolved,
        })
    }

    pub fn key(&self) -> &ArtifactKey {
        &self.key
    }

    pub fn module_version(&self) -> ResolvedModuleVersion {
        ResolvedModuleVersion::new(self.key.owner.clone())
    }

    pub fn id(&self) -> &ComponentArtifactId {
        &self.key.artifact_id
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn artifact_type(&self) -> &str {
        &self.descriptor.artifact_type
    }

    pub fn extension(&self) -> Option<&str> {
        self.descriptor.extension.as_deref()
    }

    pub fn classifier(&self) -> Option<&str> {
        self.descriptor.classifier.as_deref()
    }

    pub fn attributes(&self) -> &ImmutableAttributes {
        &self.attributes
    }

    pub fn build_dependencies(&self) -> &TaskDependency {
        &self.build_dependencies
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// The file, if already resolved. Never triggers resolution and never
    /// blocks on one in progress.
    pub fn try_file(&self) -> Option<PathBuf> {
        self.resolved.get().cloned()
    }

    /// Resolve the artifact on first call and return its file.
    ///
    /// Only the closure call is traced. A closure error is returned unchanged;
    /// whether the closure survives it depends on the [`FailurePolicy`].
    pub fn file(&self) -> Result<PathBuf, ResolveError> {
        if let Some(path) = self.resolved.get() {
            return Ok(path.clone());
        }
        let mut state = self.lock_state();
        let source = match &mut *state {
            Resolution::Resolved(path) => return Ok(path.clone()),
            Resolution::Abandoned => {
                return Err(ResolveError::Abandoned(self.id().display_name()));
            }
            Resolution::Unresolved(source) => source,
        };

        let details = self.operation_details();
        let mut resolved = None;
        let result = self.executor.run(&details, &mut || -> Result<(), ResolveError> {
            resolved = Some(source()?);
            Ok(())
        });

        match (result, resolved) {
            (Ok(()), Some(path)) => {
                let _ = self.resolved.set(path.clone());
                // Replacing the state drops the closure and everything it captured.
                *state = Resolution::Resolved(path.clone());
                tracing::debug!(artifact = %self, path = %path.display(), "artifact resolved");
                Ok(path)
            }
            (Ok(()), None) => Err(ResolveError::Other(anyhow::anyhow!(
                "operation executor did not run resolution of {}",
                self
            ))),
            (Err(e), _) => {
                if self.failure_policy == FailurePolicy::Release {
                    *state = Resolution::Abandoned;
                }
                tracing::warn!(
                    artifact = %self,
                    policy = ?self.failure_policy,
                    "artifact resolution failed: {}",
                    e
                );
                Err(e)
            }
        }
    }

    fn operation_details(&self) -> OperationDetails {
        let display_name = self.id().display_name();
        OperationDetails::display_name(format!("Resolve artifact {}", display_name))
            .name(format!("Resolve artifact {}", self.descriptor.name))
            .descriptor(display_name)
    }

    fn lock_state(&self) -> MutexGuard<'_, Resolution> {
        // A panicking closure leaves the state untouched (still Unresolved).
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Buildable for ArtifactHandle {
    fn build_dependencies(&self) -> &TaskDependency {
        &self.build_dependencies
    }
}

impl PartialEq for ArtifactHandle {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ArtifactHandle {}

impl Hash for ArtifactHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key.artifact_id, f)
    }
}

impl fmt::Debug for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ArtifactHandle");
        s.field("owner", &self.key.owner)
            .field("id", &self.key.artifact_id)
            .field("descriptor", &self.descriptor);
        match self.state.try_lock() {
            Ok(state) => s.field("state", &*state),
            Err(TryLockError::Poisoned(poisoned)) => s.field("state", &*poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => s.field("state", &format_args!("Resolving")),
        };
        s.finish()
    }
}
