//! Controller error taxonomy.
//!
//! Every gateway failure is converted into one of these kinds before it
//! leaves a controller.
//!
//! | Kind | Code | Session | Collection |
//! |------|------|---------|------------|
//! | `AuthExpired` | `AUTH_EXPIRED` | cleared | emptied |
//! | `NotAuthenticated` | `AUTH_NOT_AUTHENTICATED` | absent | untouched |
//! | `ValidationRejected` | `VALIDATION_REJECTED` | untouched | untouched |
//! | `ServerFailure` | `SERVER_FAILURE` | untouched | untouched |
//! | `TransportFailure` | `TRANSPORT_FAILURE` | untouched | untouched |
//! | `InvalidInput` | `INVALID_INPUT` | untouched | untouched |
//! | `UnknownReport` | `UNKNOWN_REPORT` | untouched | untouched |
//! | `ViewClosed` | `VIEW_CLOSED` | untouched | untouched |

use crate::gateway::GatewayError;
use fixit_auth::SessionDenied;
use fixit_types::{DraftError, ErrorCode, IncompleteTriage, ReportId};
use thiserror::Error;

/// Classified controller failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// The report fetch was rejected with 401; the session is gone.
    #[error("session expired, please log in again")]
    AuthExpired,

    /// Refused locally because no session is held.
    #[error("not logged in")]
    NotAuthenticated,

    /// The server rejected the request.
    #[error("{detail}")]
    ValidationRejected { status: u16, detail: String },

    /// The server failed to process the request.
    #[error("server error ({status}): {detail}")]
    ServerFailure { status: u16, detail: String },

    /// No usable response was received.
    #[error("request failed: {message}")]
    TransportFailure { message: String },

    /// Local precondition failed before any request was sent.
    #[error("{0}")]
    InvalidInput(String),

    /// The report is not in the loaded collection.
    #[error("report {0} is not in the loaded collection")]
    UnknownReport(ReportId),

    /// The result arrived after its view was closed and was discarded.
    #[error("view closed before the result arrived")]
    ViewClosed,
}

impl ControllerError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Maps a gateway failure for any path except the report fetch.
    ///
    /// A 401 here is an ordinary rejection; only the fetch path treats it
    /// as session expiry.
    pub(crate) fn from_gateway(err: GatewayError) -> Self {
        match err {
            GatewayError::Status { status, detail } if status >= 500 => {
                Self::ServerFailure { status, detail }
            }
            GatewayError::Status { status, detail } => Self::ValidationRejected { status, detail },
            GatewayError::Transport { .. } | GatewayError::Decode(_) | GatewayError::InvalidRequest(_) => {
                Self::TransportFailure {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Returns `true` when the session was invalidated.
    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }
}

impl ErrorCode for ControllerError {
    fn code(&self) -> &'static str {
        match self {
            Self::AuthExpired => "AUTH_EXPIRED",
            Self::NotAuthenticated => "AUTH_NOT_AUTHENTICATED",
            Self::ValidationRejected { .. } => "VALIDATION_REJECTED",
            Self::ServerFailure { .. } => "SERVER_FAILURE",
            Self::TransportFailure { .. } => "TRANSPORT_FAILURE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UnknownReport(_) => "UNKNOWN_REPORT",
            Self::ViewClosed => "VIEW_CLOSED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::TransportFailure { .. } | Self::ServerFailure { .. })
    }
}

impl From<SessionDenied> for ControllerError {
    fn from(err: SessionDenied) -> Self {
        match err {
            SessionDenied::NotAuthenticated => Self::NotAuthenticated,
        }
    }
}

impl From<DraftError> for ControllerError {
    fn from(err: DraftError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<IncompleteTriage> for ControllerError {
    fn from(err: IncompleteTriage) -> Self {
        Self::TransportFailure {
            message: err.to_string(),
        }
    }
}
