//! Build dependencies: tasks that must run before an artifact exists.
//!
//! The handle never interprets these; it only hands them back to whoever
//! schedules the build.

use std::sync::Arc;

/// Opaque, immutable set of task paths (e.g. `:lib:jar`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDependency {
    tasks: Arc<[String]>,
}

impl TaskDependency {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tasks: tasks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Something whose existence depends on tasks running first.
pub trait Buildable {
    fn build_dependencies(&self) -> &TaskDependency;
}
