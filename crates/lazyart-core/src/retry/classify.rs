//! Classify resolution errors into retry policy error kinds.

use std::io;

use crate::error::ResolveError;
use crate::retry::policy::ErrorKind;

/// Classify an I/O error for retry decisions.
pub fn classify_io_error(e: &io::Error) -> ErrorKind {
    match e.kind() {
        io::ErrorKind::TimedOut => ErrorKind::Timeout,
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => ErrorKind::Interrupted,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => ErrorKind::Connection,
        _ => ErrorKind::Other,
    }
}

/// Classify a resolution error. Only I/O failures can be transient; missing
/// artifacts, failed builds and checksum mismatches are final.
pub fn classify(e: &ResolveError) -> ErrorKind {
    match e {
        ResolveError::Io { source, .. } => classify_io_error(source),
        ResolveError::Other(inner) => inner
            .downcast_ref::<io::Error>()
            .map(classify_io_error)
            .unwrap_or(ErrorKind::Other),
        ResolveError::Missing(_)
        | ResolveError::Build(_)
        | ResolveError::ChecksumMismatch { .. }
        | ResolveError::Abandoned(_) => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err(kind: io::ErrorKind) -> ResolveError {
        ResolveError::io("/cache/a.jar", io::Error::new(kind, "x"))
    }

    #[test]
    fn timeouts_and_resets_are_transient() {
        assert_eq!(classify(&io_err(io::ErrorKind::TimedOut)), ErrorKind::Timeout);
        assert_eq!(
            classify(&io_err(io::ErrorKind::ConnectionReset)),
            ErrorKind::Connection
        );
        assert_eq!(
            classify(&io_err(io::ErrorKind::Interrupted)),
            ErrorKind::Interrupted
        );
    }

    #[test]
    fn missing_files_and_permissions_are_final() {
        assert_eq!(classify(&io_err(io::ErrorKind::NotFound)), ErrorKind::Other);
        assert_eq!(
            classify(&io_err(io::ErrorKind::PermissionDenied)),
            ErrorKind::Other
        );
        assert_eq!(
            classify(&ResolveError::Missing("a.jar".into())),
            ErrorKind::Other
        );
        assert_eq!(classify(&ResolveError::Build(":a".into())), ErrorKind::Other);
    }

    #[test]
    fn wrapped_io_errors_are_classified() {
        let e = ResolveError::Other(anyhow::Error::new(io::Error::new(
            io::ErrorKind::TimedOut,
            "slow mirror",
        )));
        assert_eq!(classify(&e), ErrorKind::Timeout);
    }
}
