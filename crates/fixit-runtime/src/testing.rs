//! Test utilities.
//!
//! [`FakeGateway`] is an in-memory report service. It keeps a server-side
//! report list, answers every endpoint from scripted state, and records
//! each call so tests can assert that no request was sent.

use crate::gateway::{
    AccessToken, ApiGateway, GatewayError, LoginForm, PasswordReset, Registration, ResetTicket,
};
use async_trait::async_trait;
use fixit_auth::Credential;
use fixit_types::{CreatedReport, Priority, Report, ReportDraft, ReportId, ReportStatus};
use parking_lot::Mutex;

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login { username: String },
    Register { email: String },
    ForgotPassword { email: String },
    ResetPassword { email: String },
    ListReports,
    ProbeAdmin,
    CreateReport { title: String },
    UpdateStatus { id: ReportId, status: ReportStatus },
}

type CallHook = Box<dyn Fn(&Call) + Send + Sync>;

struct FakeState {
    reports: Vec<Report>,
    next_id: u64,
    token: String,
    admin: Result<(), GatewayError>,
    reset_token: Option<String>,
    creation: Option<CreatedReport>,
    login_failure: Option<GatewayError>,
    register_failure: Option<GatewayError>,
    forgot_failure: Option<GatewayError>,
    reset_failure: Option<GatewayError>,
    list_failure: Option<GatewayError>,
    create_failure: Option<GatewayError>,
    update_failure: Option<GatewayError>,
    calls: Vec<Call>,
}

/// Scripted in-memory [`ApiGateway`].
///
/// Defaults: login issues `fake-token`, the admin probe is refused with
/// 403, the report list is empty, every other call succeeds.
pub struct FakeGateway {
    state: Mutex<FakeState>,
    hook: Option<CallHook>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGateway {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                reports: Vec::new(),
                next_id: 1,
                token: "fake-token".into(),
                admin: Err(GatewayError::status(403, "Not enough permissions")),
                reset_token: None,
                creation: None,
                login_failure: None,
                register_failure: None,
                forgot_failure: None,
                reset_failure: None,
                list_failure: None,
                create_failure: None,
                update_failure: None,
                calls: Vec::new(),
            }),
            hook: None,
        }
    }

    /// Seeds the server-side report list.
    #[must_use]
    pub fn with_reports(mut self, reports: Vec<Report>) -> Self {
        let state = self.state.get_mut();
        state.next_id = reports.iter().map(|r| r.id.get()).max().unwrap_or(0) + 1;
        state.reports = reports;
        self
    }

    /// Sets the token issued by login.
    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.state.get_mut().token = token.to_string();
        self
    }

    /// Makes the admin probe succeed.
    #[must_use]
    pub fn allow_admin(mut self) -> Self {
        self.state.get_mut().admin = Ok(());
        self
    }

    /// Makes the admin probe fail with `err`.
    #[must_use]
    pub fn deny_admin(mut self, err: GatewayError) -> Self {
        self.state.get_mut().admin = Err(err);
        self
    }

    /// Sets the token returned by the forgot-password endpoint.
    #[must_use]
    pub fn with_reset_token(mut self, token: &str) -> Self {
        self.state.get_mut().reset_token = Some(token.to_string());
        self
    }

    /// Returns `created` verbatim from report creation.
    #[must_use]
    pub fn with_creation(mut self, created: CreatedReport) -> Self {
        self.state.get_mut().creation = Some(created);
        self
    }

    #[must_use]
    pub fn fail_login(mut self, err: GatewayError) -> Self {
        self.state.get_mut().login_failure = Some(err);
        self
    }

    #[must_use]
    pub fn fail_register(mut self, err: GatewayError) -> Self {
        self.state.get_mut().register_failure = Some(err);
        self
    }

    #[must_use]
    pub fn fail_forgot(mut self, err: GatewayError) -> Self {
        self.state.get_mut().forgot_failure = Some(err);
        self
    }

    #[must_use]
    pub fn fail_reset(mut self, err: GatewayError) -> Self {
        self.state.get_mut().reset_failure = Some(err);
        self
    }

    #[must_use]
    pub fn fail_list(self, err: GatewayError) -> Self {
        self.set_list_failure(Some(err));
        self
    }

    #[must_use]
    pub fn fail_create(mut self, err: GatewayError) -> Self {
        self.state.get_mut().create_failure = Some(err);
        self
    }

    #[must_use]
    pub fn fail_update(self, err: GatewayError) -> Self {
        self.set_update_failure(Some(err));
        self
    }

    /// Runs `hook` on every call, after it is recorded and before it
    /// returns.
    #[must_use]
    pub fn on_call(mut self, hook: impl Fn(&Call) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Changes the report list failure while the gateway is shared.
    pub fn set_list_failure(&self, err: Option<GatewayError>) {
        self.state.lock().list_failure = err;
    }

    /// Changes the status update failure while the gateway is shared.
    pub fn set_update_failure(&self, err: Option<GatewayError>) {
        self.state.lock().update_failure = err;
    }

    /// Returns the server-side report list.
    #[must_use]
    pub fn server_reports(&self) -> Vec<Report> {
        self.state.lock().reports.clone()
    }

    /// Returns every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call.clone());
        if let Some(ref hook) = self.hook {
            hook(&call);
        }
    }
}

fn fail_or(failure: Option<&GatewayError>) -> Result<(), GatewayError> {
    match failure {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

#[async_trait]
impl ApiGateway for FakeGateway {
    async fn login(&self, form: &LoginForm) -> Result<AccessToken, GatewayError> {
        self.record(Call::Login {
            username: form.username.clone(),
        });
        let state = self.state.lock();
        fail_or(state.login_failure.as_ref())?;
        Ok(AccessToken {
            access_token: state.token.clone(),
            token_type: Some("bearer".into()),
        })
    }

    async fn register(&self, registration: &Registration) -> Result<(), GatewayError> {
        self.record(Call::Register {
            email: registration.email.clone(),
        });
        fail_or(self.state.lock().register_failure.as_ref())
    }

    async fn forgot_password(&self, email: &str) -> Result<ResetTicket, GatewayError> {
        self.record(Call::ForgotPassword {
            email: email.to_string(),
        });
        let state = self.state.lock();
        fail_or(state.forgot_failure.as_ref())?;
        Ok(ResetTicket {
            message: Some("Reset token generated".into()),
            reset_token: state.reset_token.clone(),
            expires_in_minutes: state.reset_token.as_ref().map(|_| 15),
        })
    }

    async fn reset_password(&self, reset: &PasswordReset) -> Result<(), GatewayError> {
        self.record(Call::ResetPassword {
            email: reset.email.clone(),
        });
        fail_or(self.state.lock().reset_failure.as_ref())
    }

    async fn list_reports(&self, _credential: &Credential) -> Result<Vec<Report>, GatewayError> {
        self.record(Call::ListReports);
        let state = self.state.lock();
        fail_or(state.list_failure.as_ref())?;
        Ok(state.reports.clone())
    }

    async fn probe_admin(&self, _credential: &Credential) -> Result<(), GatewayError> {
        self.record(Call::ProbeAdmin);
        self.state.lock().admin.clone()
    }

    async fn create_report(
        &self,
        _credential: &Credential,
        draft: &ReportDraft,
    ) -> Result<CreatedReport, GatewayError> {
        self.record(Call::CreateReport {
            title: draft.title().to_string(),
        });
        let mut state = self.state.lock();
        fail_or(state.create_failure.as_ref())?;
        if let Some(ref created) = state.creation {
            return Ok(created.clone());
        }

        let id = ReportId::new(state.next_id);
        state.next_id += 1;
        let report = Report {
            id,
            title: draft.title().to_string(),
            description: draft.description().to_string(),
            status: ReportStatus::Pending,
            priority: Priority::Medium,
            category: "general".into(),
            ai_summary: format!("Summary: {}", draft.title()),
            suspicious_flag: false,
            photo: draft.photo().map(str::to_string),
            owner_id: Some(1),
        };
        state.reports.push(report.clone());

        Ok(CreatedReport {
            id: Some(report.id),
            category: Some(report.category),
            priority: Some(report.priority),
            ai_summary: Some(report.ai_summary),
            suspicious_flag: Some(report.suspicious_flag),
        })
    }

    async fn update_status(
        &self,
        _credential: &Credential,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<(), GatewayError> {
        self.record(Call::UpdateStatus { id, status });
        let mut state = self.state.lock();
        fail_or(state.update_failure.as_ref())?;
        match state.reports.iter_mut().find(|r| r.id == id) {
            Some(report) => {
                report.status = status;
                Ok(())
            }
            None => Err(GatewayError::status(404, "Report not found")),
        }
    }
}

/// Builds a report with predictable field values.
#[must_use]
pub fn sample_report(id: u64, status: ReportStatus) -> Report {
    Report {
        id: ReportId::new(id),
        title: format!("Report {id}"),
        description: format!("Description of report {id}"),
        status,
        priority: Priority::Medium,
        category: "general".into(),
        ai_summary: format!("Summary of report {id}"),
        suspicious_flag: false,
        photo: None,
        owner_id: Some(1),
    }
}
