//! Error taxonomy shared by storage, rooms, sync and stats.

use thiserror::Error;

/// Errors surfaced to callers of the backend operations
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input; nothing was written
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced room does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// A concurrent action already moved the entity to a state this action cannot apply to
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store failed; any open transaction has been rolled back
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// The database was written by a newer schema than this build understands
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchema { found: u32, supported: u32 },

    #[error("could not determine data directory")]
    NoDataDirectory,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the error was caused by caller input rather than the environment
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::Conflict(_)
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(
            Error::validation("invitees required").to_string(),
            "validation failed: invitees required"
        );
        assert_eq!(Error::NotFound("room abc".into()).to_string(), "room abc not found");
    }

    #[test]
    fn client_errors_are_classified() {
        assert!(Error::validation("x").is_client_error());
        assert!(Error::Conflict("x".into()).is_client_error());
        assert!(!Error::Store(rusqlite::Error::InvalidQuery).is_client_error());
    }
}
