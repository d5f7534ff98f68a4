//! Privilege discovery by probing the admin-only collection.

use crate::gateway::ApiGateway;
use fixit_auth::{Role, SessionReader};
use std::sync::Arc;
use tracing::debug;

/// Infers the session's role from a privileged read.
///
/// Any failure, including 401, classifies the session as standard and is
/// never escalated. The session is not touched on this path.
#[derive(Clone)]
pub struct RoleResolver {
    gateway: Arc<dyn ApiGateway>,
    session: SessionReader,
}

impl RoleResolver {
    pub fn new(gateway: Arc<dyn ApiGateway>, session: SessionReader) -> Self {
        Self { gateway, session }
    }

    /// Returns `true` if the privileged endpoint accepted the credential.
    ///
    /// Without a credential no request is issued.
    pub async fn probe_privilege(&self) -> bool {
        let Some(credential) = self.session.current_credential() else {
            debug!("Privilege probe skipped: no session");
            return false;
        };

        match self.gateway.probe_admin(&credential).await {
            Ok(()) => {
                debug!("Privilege probe accepted");
                true
            }
            Err(e) => {
                debug!(error = %e, "Privilege probe rejected");
                false
            }
        }
    }

    /// Resolves the role for the current session.
    pub async fn resolve_role(&self) -> Role {
        Role::from_probe(self.probe_privilege().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, TransportKind};
    use crate::testing::{Call, FakeGateway};
    use fixit_auth::{Credential, SessionStore};

    fn session() -> (SessionReader, fixit_auth::SessionWriter) {
        SessionStore::restored(Credential::new("tok").unwrap())
    }

    #[tokio::test]
    async fn accepted_probe_is_elevated() {
        let fake = Arc::new(FakeGateway::new().allow_admin());
        let (reader, _writer) = session();
        let resolver = RoleResolver::new(fake.clone(), reader);

        assert_eq!(resolver.resolve_role().await, Role::Elevated);
        assert_eq!(fake.calls(), vec![Call::ProbeAdmin]);
    }

    #[tokio::test]
    async fn every_failure_is_standard_and_keeps_session() {
        let failures = [
            GatewayError::status(403, "Admins only"),
            GatewayError::status(401, "Could not validate credentials"),
            GatewayError::status(500, "boom"),
            GatewayError::transport(TransportKind::Timeout, "slow"),
        ];

        for failure in failures {
            let fake = Arc::new(FakeGateway::new().deny_admin(failure));
            let (reader, _writer) = session();
            let resolver = RoleResolver::new(fake, reader.clone());

            assert_eq!(resolver.resolve_role().await, Role::Standard);
            assert!(reader.is_present());
        }
    }

    #[tokio::test]
    async fn no_session_means_no_request() {
        let fake = Arc::new(FakeGateway::new().allow_admin());
        let (reader, _writer) = SessionStore::new();
        let resolver = RoleResolver::new(fake.clone(), reader);

        assert!(!resolver.probe_privilege().await);
        assert!(fake.calls().is_empty());
    }
}
