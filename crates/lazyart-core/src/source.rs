//! Ready-made resolution closures.
//!
//! Each function returns a closure suitable for
//! [`ArtifactHandle::deferred`](crate::handle::ArtifactHandle::deferred).
//! They compose: `retrying(policy, copy_verified(src, dest, digest))`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum;
use crate::error::ResolveError;
use crate::identity::ModuleVersionId;
use crate::retry::{run_with_retry, RetryPolicy};

/// Location of an artifact inside the cache directory, mirroring the Maven
/// local repository layout: `<group>/<name>/<version>/<file_name>`.
pub fn cache_path(cache_dir: &Path, owner: &ModuleVersionId, file_name: &str) -> PathBuf {
    let mut path = cache_dir.to_path_buf();
    if let Some(group) = &owner.group {
        path.push(group.replace('.', "/"));
    }
    path.join(&owner.name).join(&owner.version).join(file_name)
}

/// Copy `src` to `dest` unless `dest` already exists. Writes to
/// `<dest>.part` first and renames, so a half-written file is never
/// returned.
pub fn copy_into(
    src: PathBuf,
    dest: PathBuf,
) -> impl FnMut() -> Result<PathBuf, ResolveError> + Send + 'static {
    move || copy_checked(&src, &dest, None)
}

/// Like [`copy_into`], but the copy must match `expected_sha256`.
///
/// The `.part` file is checked before the rename and removed on mismatch, so
/// a rejected copy never lands at `dest`. An already cached `dest` is
/// re-checked and replaced from `src` when its digest is wrong.
pub fn copy_verified(
    src: PathBuf,
    dest: PathBuf,
    expected_sha256: String,
) -> impl FnMut() -> Result<PathBuf, ResolveError> + Send + 'static {
    move || copy_checked(&src, &dest, Some(&expected_sha256))
}

fn copy_checked(
    src: &Path,
    dest: &Path,
    expected: Option<&str>,
) -> Result<PathBuf, ResolveError> {
    if dest.is_file() {
        match expected.map(|digest| checksum::verify_sha256(dest, digest)) {
            None | Some(Ok(())) => {
                tracing::debug!(path = %dest.display(), "artifact already cached");
                return Ok(dest.to_path_buf());
            }
            Some(Err(ResolveError::ChecksumMismatch { actual, .. })) => {
                tracing::warn!(
                    path = %dest.display(),
                    actual = %actual,
                    "cached artifact is corrupt; replacing"
                );
                fs::remove_file(dest).map_err(|e| ResolveError::io(dest, e))?;
            }
            Some(Err(e)) => return Err(e),
        }
    }
    if !src.is_file() {
        return Err(ResolveError::Missing(src.display().to_string()));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| ResolveError::io(parent, e))?;
    }
    let part = part_path(dest);
    let bytes = fs::copy(src, &part).map_err(|e| ResolveError::io(&part, e))?;
    if let Some(digest) = expected {
        if let Err(e) = checksum::verify_sha256(&part, digest) {
            // Best effort; the mismatch is the error worth reporting.
            let _ = fs::remove_file(&part);
            return Err(e);
        }
    }
    fs::rename(&part, dest).map_err(|e| ResolveError::io(dest, e))?;
    tracing::debug!(
        src = %src.display(),
        dest = %dest.display(),
        bytes,
        "copied artifact into cache"
    );
    Ok(dest.to_path_buf())
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Check the file produced by `inner` against an expected SHA-256.
///
/// A rejected file is left where `inner` put it. For copies into the cache
/// use [`copy_verified`], which never leaves a bad file behind.
pub fn verified<F>(
    mut inner: F,
    expected_sha256: String,
) -> impl FnMut() -> Result<PathBuf, ResolveError> + Send + 'static
where
    F: FnMut() -> Result<PathBuf, ResolveError> + Send + 'static,
{
    move || {
        let path = inner()?;
        checksum::verify_sha256(&path, &expected_sha256)?;
        Ok(path)
    }
}

/// Rerun `inner` on transient failures according to `policy`.
pub fn retrying<F>(
    policy: RetryPolicy,
    mut inner: F,
) -> impl FnMut() -> Result<PathBuf, ResolveError> + Send + 'static
where
    F: FnMut() -> Result<PathBuf, ResolveError> + Send + 'static,
{
    move || run_with_retry(&policy, &mut inner)
}
