//! Server-confirmed status transitions.
//!
//! ```text
//! set_status(id, s)
//!   ├─ no session ──────────────► NotAuthenticated  (no request)
//!   ├─ id not in collection ────► UnknownReport     (no request)
//!   ├─ PUT /reports/{id}/status
//!   │    └─ failure ────────────► classified error  (collection untouched)
//!   └─ patch_status(id, s)       (only after acknowledgement)
//! ```

use super::{ControllerError, ReportCollection};
use crate::gateway::ApiGateway;
use fixit_auth::SessionReader;
use fixit_types::{ReportId, ReportStatus};
use std::sync::Arc;
use tracing::info;

/// Applies a status change to the server, then to the local collection.
#[derive(Clone)]
pub struct StatusTransitionController {
    gateway: Arc<dyn ApiGateway>,
    session: SessionReader,
}

impl StatusTransitionController {
    pub fn new(gateway: Arc<dyn ApiGateway>, session: SessionReader) -> Self {
        Self { gateway, session }
    }

    /// Changes the status of one report.
    ///
    /// Any status may follow any other. The collection is modified only
    /// after the server acknowledged the change.
    ///
    /// # Errors
    ///
    /// Local precondition failures are returned without a request; server
    /// and transport failures leave `collection` unmodified.
    pub async fn set_status(
        &self,
        collection: &mut ReportCollection,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<(), ControllerError> {
        self.confirm(collection, id, status).await?;
        collection.patch_status(id, status);
        Ok(())
    }

    /// Runs the precondition checks and the server call without patching.
    ///
    /// Callers that need a check between acknowledgement and the local
    /// patch (such as a view liveness check) use this directly.
    ///
    /// # Errors
    ///
    /// Same as [`set_status`](Self::set_status).
    pub async fn confirm(
        &self,
        collection: &ReportCollection,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<(), ControllerError> {
        let credential = self.session.require()?;
        if !collection.contains(id) {
            return Err(ControllerError::UnknownReport(id));
        }

        self.gateway
            .update_status(&credential, id, status)
            .await
            .map_err(ControllerError::from_gateway)?;

        info!(report = %id, status = %status, "Status change acknowledged");
        Ok(())
    }
}
