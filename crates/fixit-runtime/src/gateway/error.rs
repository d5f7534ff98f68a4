//! Gateway failure types and classification helpers.

use std::fmt;
use thiserror::Error;

/// Transport failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Timeout,
    Connect,
    Dns,
    Tls,
    Network,
}

impl TransportKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connection",
            Self::Dns => "dns",
            Self::Tls => "tls",
            Self::Network => "network",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured failure surfaced by an [`ApiGateway`](super::ApiGateway).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The request never produced a response.
    #[error("{kind} error: {message}")]
    Transport {
        kind: TransportKind,
        message: String,
    },

    /// A 2xx response could not be read or decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The request could not be built (bad base URL, bad header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Creates a status error.
    pub fn status(status: u16, detail: impl Into<String>) -> Self {
        Self::Status {
            status,
            detail: detail.into(),
        }
    }

    /// Creates a transport error.
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Returns `true` exactly for `401 Unauthorized`.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Returns the HTTP status, if the server answered.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classifies a reqwest error.
    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_builder() {
            return Self::InvalidRequest(error.to_string());
        }
        if error.is_decode() {
            return Self::Decode(error.to_string());
        }
        Self::transport(classify_reqwest_error(error), error_chain_message(error))
    }
}

/// Maps a reqwest error onto a [`TransportKind`].
///
/// Timeouts and connect failures are reported by reqwest directly; DNS and
/// TLS failures surface as connect errors whose source chain names them.
pub(crate) fn classify_reqwest_error(error: &reqwest::Error) -> TransportKind {
    if error.is_timeout() {
        return TransportKind::Timeout;
    }

    let chain = error_chain_message(error).to_lowercase();
    if chain.contains("dns") || chain.contains("resolve") || chain.contains("lookup") {
        TransportKind::Dns
    } else if chain.contains("tls") || chain.contains("certificate") || chain.contains("ssl") {
        TransportKind::Tls
    } else if error.is_connect() {
        TransportKind::Connect
    } else if chain.contains("timed out") {
        TransportKind::Timeout
    } else {
        TransportKind::Network
    }
}

/// Joins an error and all of its sources into one line.
fn error_chain_message(error: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(err) = source {
        let text = err.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        source = err.source();
    }
    parts.join(": ")
}

/// Extracts the human-facing message from an error body.
///
/// Understands the two shapes the server produces: `{"detail": "..."}`
/// and validation lists `{"detail": [{"msg": "..."}, ...]}`. Anything
/// else is returned as (truncated) text.
pub(crate) fn extract_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(serde_json::Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no detail provided".to_string()
    } else {
        truncate_for_error(trimmed, 500).to_string()
    }
}

/// Truncates a string on a char boundary.
pub(crate) fn truncate_for_error(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_from_string() {
        assert_eq!(
            extract_detail(r#"{"detail":"Invalid credentials"}"#),
            "Invalid credentials"
        );
    }

    #[test]
    fn detail_from_validation_list() {
        let body = r#"{"detail":[{"loc":["body","title"],"msg":"field required"},{"msg":"bad status"}]}"#;
        assert_eq!(extract_detail(body), "field required; bad status");
    }

    #[test]
    fn detail_falls_back_to_body_text() {
        assert_eq!(extract_detail("Internal Server Error"), "Internal Server Error");
        assert_eq!(extract_detail("   "), "no detail provided");
        assert_eq!(extract_detail(r#"{"error":"x"}"#), r#"{"error":"x"}"#);
    }

    #[test]
    fn long_body_is_truncated() {
        let body = "x".repeat(2_000);
        assert_eq!(extract_detail(&body).len(), 500);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "ééé";
        assert_eq!(truncate_for_error(s, 3), "é");
        assert_eq!(truncate_for_error(s, 100), s);
    }

    #[test]
    fn unauthorized_is_only_401() {
        assert!(GatewayError::status(401, "expired").is_unauthorized());
        assert!(!GatewayError::status(403, "forbidden").is_unauthorized());
        assert!(!GatewayError::transport(TransportKind::Timeout, "slow").is_unauthorized());
        assert_eq!(GatewayError::status(404, "x").http_status(), Some(404));
        assert_eq!(GatewayError::Decode("x".into()).http_status(), None);
    }

    #[test]
    fn display_includes_status_and_detail() {
        let err = GatewayError::status(422, "title missing");
        assert_eq!(err.to_string(), "HTTP 422: title missing");
        let err = GatewayError::transport(TransportKind::Connect, "refused");
        assert_eq!(err.to_string(), "connection error: refused");
    }
}
