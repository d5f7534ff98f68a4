//! Session and role model for the FixIt console.
//!
//! # Concepts
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`Credential`] | Opaque bearer token, redacted in all formatting |
//! | [`SessionReader`] | Read capability, handed to every controller |
//! | [`SessionWriter`] | Write capability, held by login/logout and the 401 handler |
//! | [`Role`] | Standard or elevated, inferred per view entry by a privilege probe |
//!
//! # Single Writer
//!
//! Session validity changes in exactly three places: a successful login,
//! an explicit logout, and an authorization failure while fetching the
//! report list. Each of them owns a [`SessionWriter`]; nothing else can
//! construct one.

pub mod credential;
pub mod error;
pub mod role;
pub mod session;

pub use credential::{Credential, EmptyCredential};
pub use error::SessionDenied;
pub use role::Role;
pub use session::{Session, SessionReader, SessionStore, SessionWriter};
