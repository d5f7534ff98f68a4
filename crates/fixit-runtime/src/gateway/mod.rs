//! Report service gateway.
//!
//! ```text
//! controllers ──► Arc<dyn ApiGateway> ──┬──► HttpGateway (reqwest)
//!                                       └──► FakeGateway (tests)
//! ```
//!
//! Every method returns [`GatewayError`]; the controllers own the mapping
//! from transport outcomes to the user-facing error taxonomy.

mod error;
mod http;

pub use error::{GatewayError, TransportKind};
pub use http::HttpGateway;

use async_trait::async_trait;
use fixit_auth::Credential;
use fixit_types::{CreatedReport, Report, ReportDraft, ReportId, ReportStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login form (`application/x-www-form-urlencoded`).
///
/// The server names the email field `username`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Account registration payload.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response to a password reset request.
///
/// The server may hand the reset token back directly; when it does not,
/// the user has to obtain it out of band.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResetTicket {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reset_token: Option<String>,
    #[serde(default)]
    pub expires_in_minutes: Option<u32>,
}

/// Password reset confirmation payload.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct PasswordReset {
    pub email: String,
    pub reset_token: String,
    pub new_password: String,
}

impl fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordReset")
            .field("email", &self.email)
            .field("reset_token", &"<redacted>")
            .field("new_password", &"<redacted>")
            .finish()
    }
}

/// Transport to the report service.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// `POST /users/login`
    async fn login(&self, form: &LoginForm) -> Result<AccessToken, GatewayError>;

    /// `POST /users/register`
    async fn register(&self, registration: &Registration) -> Result<(), GatewayError>;

    /// `POST /users/forgot-password`
    async fn forgot_password(&self, email: &str) -> Result<ResetTicket, GatewayError>;

    /// `POST /users/reset-password`
    async fn reset_password(&self, reset: &PasswordReset) -> Result<(), GatewayError>;

    /// `GET /reports/`
    async fn list_reports(&self, credential: &Credential) -> Result<Vec<Report>, GatewayError>;

    /// `GET /admin/reports`, used only for its status code.
    async fn probe_admin(&self, credential: &Credential) -> Result<(), GatewayError>;

    /// `POST /reports/`
    async fn create_report(
        &self,
        credential: &Credential,
        draft: &ReportDraft,
    ) -> Result<CreatedReport, GatewayError>;

    /// `PUT /reports/{id}/status`
    async fn update_status(
        &self,
        credential: &Credential,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_secrets() {
        let form = LoginForm {
            username: "a@b.c".into(),
            password: "hunter22".into(),
        };
        let token: AccessToken =
            serde_json::from_str(r#"{"access_token":"tok-123","token_type":"bearer"}"#).unwrap();
        let reset = PasswordReset {
            email: "a@b.c".into(),
            reset_token: "rst-9".into(),
            new_password: "secret!".into(),
        };

        let rendered = format!("{form:?} {token:?} {reset:?}");
        assert!(!rendered.contains("hunter22"));
        assert!(!rendered.contains("tok-123"));
        assert!(!rendered.contains("rst-9"));
        assert!(!rendered.contains("secret!"));
        assert!(rendered.contains("a@b.c"));
    }

    #[test]
    fn reset_ticket_tolerates_missing_token() {
        let ticket: ResetTicket =
            serde_json::from_str(r#"{"message":"If the email exists, a reset link was sent"}"#)
                .unwrap();
        assert!(ticket.reset_token.is_none());

        let ticket: ResetTicket = serde_json::from_str(
            r#"{"message":"ok","reset_token":"abc","expires_in_minutes":15}"#,
        )
        .unwrap();
        assert_eq!(ticket.reset_token.as_deref(), Some("abc"));
        assert_eq!(ticket.expires_in_minutes, Some(15));
    }
}
