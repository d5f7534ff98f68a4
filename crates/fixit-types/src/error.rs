//! Unified error interface for FixIt.
//!
//! Every error type that can reach the presentation layer implements
//! [`ErrorCode`], so the console can branch on a stable code instead of
//! matching display strings.
//!
//! # Example
//!
//! ```
//! use fixit_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     Offline,
//!     Rejected,
//! }
//!
//! impl ErrorCode for FetchError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Offline => "FETCH_OFFLINE",
//!             Self::Rejected => "FETCH_REJECTED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Offline)
//!     }
//! }
//!
//! let err = FetchError::Offline;
//! assert_eq!(err.code(), "FETCH_OFFLINE");
//! assert!(err.is_recoverable());
//! ```

/// Machine-readable error classification.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**: e.g. `"AUTH_EXPIRED"`, `"TRANSPORT_FAILURE"`
/// - **Stable**: codes are part of the console's output contract
///
/// # Recoverability
///
/// An error is recoverable when repeating the same action unchanged may
/// succeed (network blips, server hiccups). Rejected input, missing
/// sessions and unknown reports are not recoverable by retrying.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the same action may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code follows the FixIt conventions.
///
/// # Panics
///
/// Panics if the code is empty or not UPPER_SNAKE_CASE.
///
/// # Example
///
/// ```
/// use fixit_types::{assert_error_code, ErrorCode};
///
/// struct Timeout;
///
/// impl ErrorCode for Timeout {
///     fn code(&self) -> &'static str { "HTTP_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Timeout);
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates multiple error codes at once.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E]) {
    for err in errors {
        assert_error_code(err);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
