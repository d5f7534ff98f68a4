//! View-scoped composition of the controllers.
//!
//! A view is entered, used, and eventually closed. Results that arrive
//! after [`ViewLifetime::close`] are discarded at the continuation
//! boundary instead of being applied.
//!
//! ```text
//! enter()
//!   ├─ no session ─────────► NotAuthenticated (nothing sent)
//!   └─ tokio::join!
//!        ├─ ReportSynchronizer::load_reports()   (401 clears session)
//!        └─ RoleResolver::resolve_role()         (failures → standard)
//!      │
//!      ├─ view closed ─────► ViewClosed (nothing applied)
//!      └─ apply role; apply collection or empty it
//! ```

use super::{
    ControllerError, CreationFlow, ReportCollection, ReportSynchronizer, RoleResolver,
    StatusTransitionController,
};
use crate::gateway::ApiGateway;
use fixit_auth::{Role, SessionReader, SessionWriter};
use fixit_types::{ReportDraft, ReportId, ReportStatus, TriageResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Shared liveness flag for a view.
///
/// Clones observe the same flag; closing is permanent.
#[derive(Debug, Clone)]
pub struct ViewLifetime {
    live: Arc<AtomicBool>,
}

impl ViewLifetime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Marks the view torn down.
    pub fn close(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Returns [`ControllerError::ViewClosed`] once the view is closed.
    fn ensure_live(&self) -> Result<(), ControllerError> {
        if self.is_live() {
            Ok(())
        } else {
            debug!("Discarding result for closed view");
            Err(ControllerError::ViewClosed)
        }
    }
}

impl Default for ViewLifetime {
    fn default() -> Self {
        Self::new()
    }
}

/// The report list view.
///
/// Role is recomputed on every [`enter`](Self::enter) and never cached
/// beyond the view.
pub struct ReportsView {
    session: SessionReader,
    synchronizer: ReportSynchronizer,
    roles: RoleResolver,
    transitions: StatusTransitionController,
    lifetime: ViewLifetime,
    collection: ReportCollection,
    role: Role,
}

impl ReportsView {
    pub fn new(gateway: Arc<dyn ApiGateway>, writer: SessionWriter) -> Self {
        let reader = writer.reader();
        Self {
            roles: RoleResolver::new(Arc::clone(&gateway), reader.clone()),
            transitions: StatusTransitionController::new(Arc::clone(&gateway), reader.clone()),
            session: reader,
            synchronizer: ReportSynchronizer::new(gateway, writer),
            lifetime: ViewLifetime::new(),
            collection: ReportCollection::default(),
            role: Role::Standard,
        }
    }

    /// Returns a handle that can close this view from elsewhere.
    #[must_use]
    pub fn lifetime(&self) -> ViewLifetime {
        self.lifetime.clone()
    }

    #[must_use]
    pub fn reports(&self) -> &ReportCollection {
        &self.collection
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Loads the collection and resolves the role concurrently.
    ///
    /// On fetch failure the collection is emptied and the role is still
    /// applied.
    ///
    /// # Errors
    ///
    /// [`ControllerError::NotAuthenticated`] without a session (nothing is
    /// sent), [`ControllerError::ViewClosed`] if the view closed while the
    /// calls were in flight, otherwise the fetch failure.
    pub async fn enter(&mut self) -> Result<(), ControllerError> {
        self.lifetime.ensure_live()?;
        if !self.session.is_present() {
            self.collection.clear();
            self.role = Role::Standard;
            return Err(ControllerError::NotAuthenticated);
        }

        let (loaded, role) = tokio::join!(
            self.synchronizer.load_reports(),
            self.roles.resolve_role()
        );

        self.lifetime.ensure_live()?;

        self.role = role;
        match loaded {
            Ok(collection) => {
                self.collection.replace_all(collection);
                Ok(())
            }
            Err(e) => {
                self.collection.clear();
                Err(e)
            }
        }
    }

    /// Changes one report's status.
    ///
    /// The exclusive borrow keeps a second change from starting while one
    /// is pending.
    ///
    /// # Errors
    ///
    /// As [`StatusTransitionController::set_status`], plus
    /// [`ControllerError::ViewClosed`] if the acknowledgement arrived after
    /// the view closed (the collection is then left as it was).
    pub async fn set_status(
        &mut self,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<(), ControllerError> {
        self.lifetime.ensure_live()?;
        self.transitions.confirm(&self.collection, id, status).await?;
        self.lifetime.ensure_live()?;
        self.collection.patch_status(id, status);
        Ok(())
    }
}

/// The report submission view.
pub struct CreationView {
    flow: CreationFlow,
    lifetime: ViewLifetime,
}

impl CreationView {
    pub fn new(flow: CreationFlow) -> Self {
        Self {
            flow,
            lifetime: ViewLifetime::new(),
        }
    }

    #[must_use]
    pub fn lifetime(&self) -> ViewLifetime {
        self.lifetime.clone()
    }

    /// Submits a draft and returns its triage if the view is still open.
    ///
    /// # Errors
    ///
    /// As [`CreationFlow::submit`], plus [`ControllerError::ViewClosed`].
    pub async fn submit(&mut self, draft: &ReportDraft) -> Result<TriageResult, ControllerError> {
        self.lifetime.ensure_live()?;
        let triage = self.flow.submit(draft).await?;
        self.lifetime.ensure_live()?;
        Ok(triage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_clones_share_flag() {
        let lifetime = ViewLifetime::new();
        let other = lifetime.clone();
        assert!(other.is_live());

        lifetime.close();
        assert!(!other.is_live());
        assert_eq!(other.ensure_live(), Err(ControllerError::ViewClosed));
    }
}
