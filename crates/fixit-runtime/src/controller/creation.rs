//! Report submission.

use super::ControllerError;
use crate::gateway::ApiGateway;
use fixit_auth::SessionReader;
use fixit_types::{ReportDraft, TriageResult};
use std::sync::Arc;
use tracing::info;

/// Submits new reports and returns their triage.
///
/// The triage result is handed to the caller only. No cached collection is
/// updated; the next fetch picks up the new report.
#[derive(Clone)]
pub struct CreationFlow {
    gateway: Arc<dyn ApiGateway>,
    session: SessionReader,
}

impl CreationFlow {
    pub fn new(gateway: Arc<dyn ApiGateway>, session: SessionReader) -> Self {
        Self { gateway, session }
    }

    /// Validates raw fields and submits them.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidInput`] for a blank title or description,
    /// otherwise as [`submit`](Self::submit).
    pub async fn submit_fields(
        &self,
        title: &str,
        description: &str,
        photo: Option<String>,
    ) -> Result<TriageResult, ControllerError> {
        let draft = ReportDraft::new(title, description, photo)?;
        self.submit(&draft).await
    }

    /// Submits a validated draft.
    ///
    /// Either a triage result with every field populated is returned, or an
    /// error; a response missing any triage field is a transport failure.
    ///
    /// # Errors
    ///
    /// [`ControllerError::NotAuthenticated`] without a session (no request),
    /// or the classified server/transport failure.
    pub async fn submit(&self, draft: &ReportDraft) -> Result<TriageResult, ControllerError> {
        let credential = self.session.require()?;

        let created = self
            .gateway
            .create_report(&credential, draft)
            .await
            .map_err(ControllerError::from_gateway)?;

        let triage = TriageResult::try_from(created)?;
        info!(
            report = %triage.report_id,
            priority = %triage.priority,
            suspicious = triage.suspicious_flag,
            "Report created"
        );
        Ok(triage)
    }
}
