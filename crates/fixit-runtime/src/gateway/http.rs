//! reqwest-backed [`ApiGateway`].

use super::error::{extract_detail, GatewayError};
use super::{AccessToken, ApiGateway, LoginForm, PasswordReset, Registration, ResetTicket};
use crate::config::ApiConfig;
use async_trait::async_trait;
use fixit_auth::Credential;
use fixit_types::{CreatedReport, Report, ReportDraft, ReportId, ReportStatus};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Maximum accepted response body size (10 MiB).
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// How much of an error body is kept for its detail message (64 KiB).
const MAX_ERROR_BODY_SIZE: usize = 64 * 1024;

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct StatusBody {
    status: ReportStatus,
}

/// Gateway talking to the report service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Builds a gateway from endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, GatewayError> {
        Self::with_timeout(config.normalized_base_url(), config.timeout())
    }

    /// Builds a gateway for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the HTTP client cannot be
    /// constructed.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fixit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL all paths are joined onto.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        request.header(AUTHORIZATION, credential.authorization_value())
    }

    /// Sends a request and returns the body of a 2xx response.
    ///
    /// The status is classified before the body is read, so a non-2xx
    /// response always surfaces as [`GatewayError::Status`] however
    /// malformed its body is.
    async fn execute(&self, label: &'static str, request: RequestBuilder) -> Result<String, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response, MAX_ERROR_BODY_SIZE).await;
            debug!(endpoint = label, status = status.as_u16(), bytes = body.len(), "Error response received");
            return Err(GatewayError::status(status.as_u16(), extract_detail(&body)));
        }

        let body = read_body_limited(response, MAX_BODY_SIZE).await?;
        debug!(endpoint = label, status = status.as_u16(), bytes = body.len(), "Response received");
        Ok(body)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        label: &'static str,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let body = self.execute(label, request).await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(format!("{label}: {e}")))
    }
}

/// Reads a response body, refusing to buffer more than `limit` bytes.
async fn read_body_limited(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<String, GatewayError> {
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(GatewayError::Decode(format!(
                "response body too large ({len} bytes, limit {limit})"
            )));
        }
    }

    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| GatewayError::from_reqwest(&e))?
    {
        if buf.len() + chunk.len() > limit {
            return Err(GatewayError::Decode(format!(
                "response body exceeds limit of {limit} bytes"
            )));
        }
        buf.extend_from_slice(&chunk);
    }

    String::from_utf8(buf).map_err(|_| GatewayError::Decode("response body is not UTF-8".into()))
}

/// Reads at most `limit` bytes of an error body.
///
/// Never fails: a broken stream ends the read, and invalid UTF-8 is
/// replaced.
async fn read_error_body(mut response: reqwest::Response, limit: usize) -> String {
    let mut buf: Vec<u8> = Vec::new();
    while buf.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(limit - buf.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "Error body read interrupted");
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn login(&self, form: &LoginForm) -> Result<AccessToken, GatewayError> {
        let request = self.client.post(self.url("/users/login")).form(form);
        self.execute_json("login", request).await
    }

    async fn register(&self, registration: &Registration) -> Result<(), GatewayError> {
        let request = self.client.post(self.url("/users/register")).json(registration);
        self.execute("register", request).await.map(drop)
    }

    async fn forgot_password(&self, email: &str) -> Result<ResetTicket, GatewayError> {
        let request = self
            .client
            .post(self.url("/users/forgot-password"))
            .json(&EmailBody { email });
        self.execute_json("forgot_password", request).await
    }

    async fn reset_password(&self, reset: &PasswordReset) -> Result<(), GatewayError> {
        let request = self.client.post(self.url("/users/reset-password")).json(reset);
        self.execute("reset_password", request).await.map(drop)
    }

    async fn list_reports(&self, credential: &Credential) -> Result<Vec<Report>, GatewayError> {
        let request = self.authorized(self.client.get(self.url("/reports/")), credential);
        self.execute_json("list_reports", request).await
    }

    async fn probe_admin(&self, credential: &Credential) -> Result<(), GatewayError> {
        let request = self.authorized(self.client.get(self.url("/reports/admin/all")), credential);
        self.execute("probe_admin", request).await.map(drop)
    }

    async fn create_report(
        &self,
        credential: &Credential,
        draft: &ReportDraft,
    ) -> Result<CreatedReport, GatewayError> {
        let request = self.authorized(self.client.post(self.url("/reports/")), credential).json(draft);
        self.execute_json("create_report", request).await
    }

    async fn update_status(
        &self,
        credential: &Credential,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<(), GatewayError> {
        let request = self
            .authorized(self.client.put(self.url(&format!("/reports/{id}/status"))), credential)
            .json(&StatusBody { status });
        self.execute("update_status", request).await.map(drop)
    }
}
