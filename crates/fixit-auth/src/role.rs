//! Role classification.

use std::fmt;

/// Privilege classification of the current session.
///
/// The role is never read from a token or profile. It is derived each time
/// the report view is entered by probing a privileged-only endpoint, and is
/// never persisted.
///
/// # Not a Security Boundary
///
/// The role only decides which controls the console offers. The server
/// still authorizes every privileged write on its own.
///
/// # Example
///
/// ```
/// use fixit_auth::Role;
///
/// assert_eq!(Role::default(), Role::Standard);
/// assert!(Role::from_probe(true).is_elevated());
/// assert!(!Role::from_probe(false).is_elevated());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// May browse and submit reports.
    #[default]
    Standard,
    /// May additionally change report status.
    Elevated,
}

impl Role {
    /// Maps a privilege probe outcome to a role.
    #[must_use]
    pub fn from_probe(privileged: bool) -> Self {
        if privileged {
            Self::Elevated
        } else {
            Self::Standard
        }
    }

    /// Returns `true` for [`Role::Elevated`].
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Elevated)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Elevated => f.write_str("elevated"),
        }
    }
}
