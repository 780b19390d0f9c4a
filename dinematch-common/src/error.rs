// dinematch-common/src/error.rs
use thiserror::Error;

/// Failures surfaced by the session store, the consensus engine and the
/// places directory. None of them is fatal to the process.
#[derive(Debug, Error)]
pub enum DineError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session {0} has no members")]
    NoMembers(String),

    #[error("Places directory request failed: {0}")]
    UpstreamFetchFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_identifier() {
        let err = DineError::SessionNotFound("ghost".into());
        assert_eq!(err.to_string(), "Session not found: ghost");

        let err = DineError::NoMembers("s1".into());
        assert_eq!(err.to_string(), "Session s1 has no members");
    }

    #[test]
    fn test_io_conversion() {
        fn open() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))?;
            Ok(())
        }
        assert!(matches!(open(), Err(DineError::Io(_))));
    }
}
