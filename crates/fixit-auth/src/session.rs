//! Session store with a single-writer capability.
//!
//! The credential is the only process-wide mutable value in the console.
//! It is shared through two handles to the same slot:
//!
//! ```text
//!                 SessionStore::new()
//!                  │              │
//!          SessionReader      SessionWriter
//!     (every controller)      (login, logout, 401 on report fetch)
//!                  │              │
//!                  └──► Arc<RwLock<Option<Credential>>> ◄──┘
//! ```
//!
//! A [`SessionWriter`] can only be obtained from [`SessionStore::new`], so
//! the set of code paths able to change session validity is exactly the
//! set of places a writer was handed to.

use crate::{Credential, SessionDenied};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

type Slot = Arc<RwLock<Option<Credential>>>;

/// Constructor for a fresh, empty session slot.
///
/// # Example
///
/// ```
/// use fixit_auth::{Credential, SessionStore};
///
/// let (reader, writer) = SessionStore::new();
/// assert!(!reader.is_present());
///
/// writer.set_session(Credential::new("tok").unwrap());
/// assert!(reader.is_present());
///
/// assert!(writer.clear_session());
/// assert!(reader.current_credential().is_none());
/// ```
#[derive(Debug)]
pub struct SessionStore;

impl SessionStore {
    /// Creates an empty session and returns its read and write handles.
    #[allow(clippy::new_ret_no_self)]
    #[must_use]
    pub fn new() -> (SessionReader, SessionWriter) {
        let slot: Slot = Arc::new(RwLock::new(None));
        (
            SessionReader {
                slot: Arc::clone(&slot),
            },
            SessionWriter { slot },
        )
    }

    /// Creates a session already holding `credential`.
    ///
    /// Used when a stored credential is restored at startup.
    #[must_use]
    pub fn restored(credential: Credential) -> (SessionReader, SessionWriter) {
        let (reader, writer) = Self::new();
        writer.set_session(credential);
        (reader, writer)
    }
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    credential: Option<Credential>,
}

impl Session {
    /// Returns `true` if a credential is held.
    #[must_use]
    pub fn present(&self) -> bool {
        self.credential.is_some()
    }

    /// Returns the held credential, if any.
    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.present() {
            f.write_str("authenticated")
        } else {
            f.write_str("anonymous")
        }
    }
}

/// Read capability over the session slot.
#[derive(Debug, Clone)]
pub struct SessionReader {
    slot: Slot,
}

impl SessionReader {
    /// Returns the current credential, or `None` when logged out.
    #[must_use]
    pub fn current_credential(&self) -> Option<Credential> {
        self.slot.read().clone()
    }

    /// Returns `true` if a credential is held.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Returns the current credential or refuses locally.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDenied::NotAuthenticated`] when logged out.
    pub fn require(&self) -> Result<Credential, SessionDenied> {
        self.current_credential().ok_or(SessionDenied::NotAuthenticated)
    }

    /// Returns a snapshot of the session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        Session {
            credential: self.current_credential(),
        }
    }
}

/// Write capability over the session slot.
///
/// Only login, logout and the report-fetch authorization failure path
/// hold one of these.
#[derive(Debug, Clone)]
pub struct SessionWriter {
    slot: Slot,
}

impl SessionWriter {
    /// Stores `credential` and marks the session present.
    pub fn set_session(&self, credential: Credential) {
        let replaced = self.slot.write().replace(credential).is_some();
        tracing::info!(replaced, "Session established");
    }

    /// Removes the credential.
    ///
    /// Returns `true` if a credential was held. Clearing an empty session
    /// is a no-op.
    pub fn clear_session(&self) -> bool {
        let cleared = self.slot.write().take().is_some();
        if cleared {
            tracing::info!("Session cleared");
        }
        cleared
    }

    /// Returns a reader over the same slot.
    #[must_use]
    pub fn reader(&self) -> SessionReader {
        SessionReader {
            slot: Arc::clone(&self.slot),
        }
    }
}
