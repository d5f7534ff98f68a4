//! Session access errors.

use fixit_types::ErrorCode;
use thiserror::Error;

/// A privileged operation was attempted without a usable session.
///
/// Raised locally, before any network call is made.
///
/// # Example
///
/// ```
/// use fixit_auth::{SessionDenied, SessionStore};
/// use fixit_types::ErrorCode;
///
/// let (reader, _writer) = SessionStore::new();
/// let err = reader.require().unwrap_err();
/// assert_eq!(err, SessionDenied::NotAuthenticated);
/// assert_eq!(err.code(), "AUTH_NOT_AUTHENTICATED");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionDenied {
    /// No credential is held; the user must log in.
    #[error("not logged in")]
    NotAuthenticated,
}

impl ErrorCode for SessionDenied {
    fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "AUTH_NOT_AUTHENTICATED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
