//! Tests for `resolve` argument parsing.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_resolve_defaults() {
    match parse(&[
        "lazyart",
        "resolve",
        "org.example:lib:1.0",
        "lib",
        "--source",
        "build/libs/lib-1.0.jar",
    ]) {
        CliCommand::Resolve {
            owner,
            artifact,
            source,
            sha256,
            callers,
        } => {
            assert_eq!(owner, "org.example:lib:1.0");
            assert_eq!(artifact, "lib");
            assert_eq!(source, PathBuf::from("build/libs/lib-1.0.jar"));
            assert!(sha256.is_none());
            assert_eq!(callers, 1);
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_resolve_with_digest_and_callers() {
    match parse(&[
        "lazyart",
        "resolve",
        "lib:1.0",
        "lib:sources@zip",
        "--source",
        "/tmp/lib.zip",
        "--sha256",
        "abc123",
        "--callers",
        "8",
    ]) {
        CliCommand::Resolve {
            artifact,
            sha256,
            callers,
            ..
        } => {
            assert_eq!(artifact, "lib:sources@zip");
            assert_eq!(sha256.as_deref(), Some("abc123"));
            assert_eq!(callers, 8);
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_resolve_requires_source() {
    assert!(Cli::try_parse_from(["lazyart", "resolve", "lib:1.0", "lib"]).is_err());
}
