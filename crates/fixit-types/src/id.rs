//! Identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a report, assigned by the server at creation time.
///
/// The server uses integer primary keys, so the identifier is a thin
/// wrapper over `u64`. It serializes as a bare number.
///
/// # Example
///
/// ```
/// use fixit_types::ReportId;
///
/// let id: ReportId = "42".parse().unwrap();
/// assert_eq!(id, ReportId::new(42));
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(u64);

impl ReportId {
    /// Wraps a raw server identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReportId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

impl From<u64> for ReportId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
