//! `lazyart resolve` – resolve one artifact through a deferred handle.

use anyhow::{Context, Result};
use lazyart_core::config::LazyartConfig;
use lazyart_core::operation::{OperationOutcome, OperationRecord, UntracedOperationExecutor};
use lazyart_core::source;
use lazyart_core::{
    ArtifactHandle, ArtifactName, ComponentArtifactId, HandleServices, ModuleVersionId,
    OperationExecutor, RecordingOperationExecutor, ResolveFn, TaskDependency,
    TracingOperationExecutor,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ResolveArgs {
    pub owner: String,
    pub artifact: String,
    pub source: PathBuf,
    pub sha256: Option<String>,
    pub callers: usize,
}

/// Closure that copies the source into the cache, optionally verifying and
/// retrying per config.
fn resolution_source(cfg: &LazyartConfig, args: &ResolveArgs, dest: PathBuf) -> ResolveFn {
    let mut f: ResolveFn = match &args.sha256 {
        Some(digest) => Box::new(source::copy_verified(
            args.source.clone(),
            dest,
            digest.clone(),
        )),
        None => Box::new(source::copy_into(args.source.clone(), dest)),
    };
    if let Some(policy) = cfg.retry_policy() {
        f = Box::new(source::retrying(policy, f));
    }
    f
}

fn print_operations(records: &[OperationRecord]) {
    println!("  {:>8}  {:<9}  {}", "Time(ms)", "Outcome", "Operation");
    for r in records {
        let outcome = match &r.outcome {
            OperationOutcome::Succeeded => "ok".to_string(),
            OperationOutcome::Failed(msg) => format!("failed: {}", msg),
        };
        println!(
            "  {:>8}  {:<9}  {}",
            r.elapsed.as_millis(),
            outcome,
            r.details.display_name
        );
    }
}

pub async fn run_resolve(cfg: &LazyartConfig, args: ResolveArgs) -> Result<()> {
    let owner = ModuleVersionId::parse(&args.owner)?;
    let descriptor = ArtifactName::parse(&args.artifact)?;
    let file_name = descriptor.file_name(&owner.version);
    let dest = source::cache_path(&cfg.cache_dir()?, &owner, &file_name);

    let inner: Arc<dyn OperationExecutor> = if cfg.trace_operations {
        Arc::new(TracingOperationExecutor)
    } else {
        Arc::new(UntracedOperationExecutor)
    };
    let recorder = Arc::new(RecordingOperationExecutor::wrapping(inner));
    let services =
        HandleServices::new(recorder.clone()).with_failure_policy(cfg.failure_policy);

    let handle = Arc::new(ArtifactHandle::deferred(
        owner.clone(),
        descriptor,
        ComponentArtifactId::new(owner, file_name),
        TaskDependency::empty(),
        resolution_source(cfg, &args, dest),
        None,
        &services,
    )?);
    tracing::info!(artifact = %handle, callers = args.callers, "resolving");

    let tasks: Vec<_> = (0..args.callers.max(1))
        .map(|_| {
            let handle = Arc::clone(&handle);
            tokio::task::spawn_blocking(move || handle.file())
        })
        .collect();

    let mut resolved: Option<PathBuf> = None;
    let mut first_err = None;
    for task in tasks {
        match task.await.context("resolve task join")? {
            Ok(path) => {
                resolved.get_or_insert(path);
            }
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }

    print_operations(&recorder.records());
    if let Some(e) = first_err {
        return Err(e).with_context(|| format!("resolve {}", handle));
    }
    if let Some(path) = resolved {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn resolution_source_copies_and_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("lib.jar");
        fs::write(&src, b"hello\n").unwrap();
        let args = ResolveArgs {
            owner: "lib:1.0".to_string(),
            artifact: "lib".to_string(),
            source: src,
            sha256: Some(
                "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03".to_string(),
            ),
            callers: 1,
        };
        let dest = dir.path().join("cache/lib-1.0.jar");
        let mut f = resolution_source(&LazyartConfig::default(), &args, dest.clone());
        assert_eq!(f().unwrap(), dest);
    }

    #[test]
    fn resolution_source_replaces_corrupt_cache_entry_on_next_run() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("lib.jar");
        fs::write(&src, b"hello\n").unwrap();
        let dest = dir.path().join("cache/lib-1.0.jar");
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, b"truncated").unwrap();
        let args = ResolveArgs {
            owner: "lib:1.0".to_string(),
            artifact: "lib".to_string(),
            source: src,
            sha256: Some(
                "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03".to_string(),
            ),
            callers: 1,
        };
        let mut f = resolution_source(&LazyartConfig::default(), &args, dest.clone());
        assert_eq!(f().unwrap(), dest);
        assert_eq!(fs::read(&dest).unwrap(), b"hello\n");
    }
}
