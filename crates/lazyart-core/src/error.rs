//! Error types shared by the artifact handle and its collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while turning a deferred artifact into a file on disk.
///
/// Produced by resolution closures and propagated unchanged out of
/// [`ArtifactHandle::file`](crate::handle::ArtifactHandle::file).
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("artifact not found: {0}")]
    Missing(String),

    #[error("build of artifact failed: {0}")]
    Build(String),

    #[error("SHA-256 mismatch for {path:?}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// A previous attempt failed and the handle released its closure.
    #[error("resolution of {0} failed earlier and will not be retried")]
    Abandoned(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ResolveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResolveError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Attribute derivation failure; aborts handle construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttributeError {
    #[error("attribute key must not be empty")]
    EmptyKey,

    #[error("attribute {0} has an empty value")]
    EmptyValue(String),
}

/// Malformed module coordinate or artifact name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid module coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("invalid artifact name: {0}")]
    InvalidArtifactName(String),
}
