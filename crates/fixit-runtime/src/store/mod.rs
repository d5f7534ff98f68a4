//! Credential persistence between invocations.

mod credential_file;
mod error;

pub use credential_file::{persist_session, CredentialFile, StoredCredential, CREDENTIAL_FILE_VERSION};
pub use error::StorageError;
