//! Login, logout, registration and password reset.
//!
//! Login is one of the two places allowed to write the session; the other
//! is the report fetch expiry path.
//!
//! ```text
//! ResetHandshake:
//!
//!   Request ──request(email)──► AwaitingReset ──confirm(token, pw)──► Completed
//!      ▲                              │
//!      └────────────back()────────────┘
//! ```

use super::ControllerError;
use crate::gateway::{ApiGateway, GatewayError, LoginForm, PasswordReset, Registration};
use fixit_auth::{Credential, SessionWriter};
use std::sync::Arc;
use tracing::info;

/// Minimum accepted password length for new passwords.
pub const MIN_PASSWORD_LEN: usize = 6;

fn require_email(email: &str) -> Result<&str, ControllerError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ControllerError::invalid_input("please enter an email address"));
    }
    Ok(email)
}

fn require_new_password(password: &str) -> Result<(), ControllerError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ControllerError::invalid_input(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Account operations.
#[derive(Clone)]
pub struct AccountFlow {
    gateway: Arc<dyn ApiGateway>,
    writer: SessionWriter,
}

impl AccountFlow {
    pub fn new(gateway: Arc<dyn ApiGateway>, writer: SessionWriter) -> Self {
        Self { gateway, writer }
    }

    /// Exchanges credentials for a session.
    ///
    /// A 401 here means wrong credentials, not an expired session.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidInput`] for blank fields (no request),
    /// otherwise the classified failure. The session is unchanged on error.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ControllerError> {
        let email = require_email(email)?;
        if password.is_empty() {
            return Err(ControllerError::invalid_input("please enter a password"));
        }

        let form = LoginForm {
            username: email.to_string(),
            password: password.to_string(),
        };
        let token = self.gateway.login(&form).await.map_err(|e| match e {
            GatewayError::Status { status: 401, .. } => ControllerError::ValidationRejected {
                status: 401,
                detail: "Invalid credentials".into(),
            },
            other => ControllerError::from_gateway(other),
        })?;

        let credential = Credential::new(token.access_token).map_err(|_| {
            ControllerError::TransportFailure {
                message: "server returned an empty access token".into(),
            }
        })?;
        self.writer.set_session(credential);
        info!(email, "Logged in");
        Ok(())
    }

    /// Ends the session locally. Returns whether a session was held.
    pub fn logout(&self) -> bool {
        self.writer.clear_session()
    }

    /// Creates an account. Does not log in.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidInput`] for a blank email or short
    /// password (no request), otherwise the classified failure.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), ControllerError> {
        let email = require_email(email)?;
        require_new_password(password)?;

        let registration = Registration {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.gateway
            .register(&registration)
            .await
            .map_err(ControllerError::from_gateway)?;
        info!(email, "Account registered");
        Ok(())
    }

    /// Starts a password reset handshake.
    #[must_use]
    pub fn password_reset(&self) -> ResetHandshake {
        ResetHandshake::new(Arc::clone(&self.gateway))
    }
}

/// Position in the password reset handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetStep {
    /// Waiting for an email address.
    Request,
    /// Reset requested; waiting for token and new password.
    AwaitingReset {
        email: String,
        /// Token issued directly by the server, when it returns one.
        reset_token: Option<String>,
    },
    /// Password changed.
    Completed,
}

/// Two-step password reset.
pub struct ResetHandshake {
    gateway: Arc<dyn ApiGateway>,
    step: ResetStep,
}

impl ResetHandshake {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            gateway,
            step: ResetStep::Request,
        }
    }

    /// Resumes at the confirmation step for an earlier request.
    pub fn awaiting(gateway: Arc<dyn ApiGateway>, email: &str) -> Self {
        Self {
            gateway,
            step: ResetStep::AwaitingReset {
                email: email.trim().to_string(),
                reset_token: None,
            },
        }
    }

    #[must_use]
    pub fn step(&self) -> &ResetStep {
        &self.step
    }

    /// Requests a reset token for `email`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidInput`] outside the request step or for a
    /// blank email; otherwise the classified failure. The step only
    /// advances on success.
    pub async fn request(&mut self, email: &str) -> Result<&ResetStep, ControllerError> {
        if self.step != ResetStep::Request {
            return Err(ControllerError::invalid_input("a reset is already in progress"));
        }
        let email = require_email(email)?;

        let ticket = self
            .gateway
            .forgot_password(email)
            .await
            .map_err(ControllerError::from_gateway)?;

        info!(email, token_issued = ticket.reset_token.is_some(), "Password reset requested");
        self.step = ResetStep::AwaitingReset {
            email: email.to_string(),
            reset_token: ticket.reset_token.filter(|t| !t.trim().is_empty()),
        };
        Ok(&self.step)
    }

    /// Sets the new password using the reset token.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidInput`] outside the awaiting step, for a
    /// blank token, or a short password (no request); otherwise the
    /// classified failure.
    pub async fn confirm(
        &mut self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), ControllerError> {
        let ResetStep::AwaitingReset { ref email, .. } = self.step else {
            return Err(ControllerError::invalid_input("request a reset token first"));
        };
        let reset_token = reset_token.trim();
        if reset_token.is_empty() {
            return Err(ControllerError::invalid_input("please enter the reset token"));
        }
        if new_password.is_empty() {
            return Err(ControllerError::invalid_input("please enter a new password"));
        }
        require_new_password(new_password)?;

        let reset = PasswordReset {
            email: email.clone(),
            reset_token: reset_token.to_string(),
            new_password: new_password.to_string(),
        };
        self.gateway
            .reset_password(&reset)
            .await
            .map_err(ControllerError::from_gateway)?;

        info!(email = %reset.email, "Password reset completed");
        self.step = ResetStep::Completed;
        Ok(())
    }

    /// Returns to the request step.
    pub fn back(&mut self) {
        self.step = ResetStep::Request;
    }
}
