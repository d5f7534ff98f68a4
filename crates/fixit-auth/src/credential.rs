//! Bearer credential.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejected credential input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("access token must not be empty")]
pub struct EmptyCredential;

/// Opaque bearer token proving session identity.
///
/// The token text is never written by `Debug` or `Display`, so a
/// credential can be logged or embedded in errors without leaking it.
///
/// # Example
///
/// ```
/// use fixit_auth::Credential;
///
/// let cred = Credential::new("eyJhbGciOi").unwrap();
/// assert_eq!(cred.authorization_value(), "Bearer eyJhbGciOi");
/// assert!(!format!("{cred:?}").contains("eyJ"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Credential(String);

impl Credential {
    /// Wraps a token exactly as issued, rejecting empty or
    /// whitespace-only input.
    pub fn new(token: impl Into<String>) -> Result<Self, EmptyCredential> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(EmptyCredential);
        }
        Ok(Self(token))
    }

    /// Returns the raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl TryFrom<String> for Credential {
    type Error = EmptyCredential;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Credential> for String {
    fn from(value: Credential) -> Self {
        value.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<redacted, {} bytes>)", self.0.len())
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<bearer credential>")
    }
}
