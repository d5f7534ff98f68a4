//! Subcommands and their execution.
//!
//! Every command that can change the session mirrors it back to the
//! credential file when it finishes, whether it succeeded or not. That is
//! how an expired session discovered by `reports` is forgotten on disk.

use crate::{photo, render};
use anyhow::{bail, Context as _, Result};
use clap::Subcommand;
use fixit_auth::{Credential, SessionReader, SessionStore, SessionWriter};
use fixit_runtime::config::FixitConfig;
use fixit_runtime::controller::{
    AccountFlow, ControllerError, CreationFlow, CreationView, ReportsView, ResetHandshake,
    ResetStep,
};
use fixit_runtime::{persist_session, ApiGateway, CredentialFile, HttpGateway};
use fixit_types::{ReportDraft, ReportId, ReportStatus};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        /// Password (also: FIXIT_PASSWORD)
        #[arg(long, env = "FIXIT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        /// Password, at least 6 characters (also: FIXIT_PASSWORD)
        #[arg(long, env = "FIXIT_PASSWORD", hide_env_values = true)]
        password: String,
        /// Password again (also: FIXIT_CONFIRM_PASSWORD)
        #[arg(long, env = "FIXIT_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: String,
    },

    /// Password reset
    #[command(subcommand)]
    Password(PasswordCommand),

    /// List reports
    Reports,

    /// Change a report's status (elevated sessions only)
    Status {
        /// Report id
        id: ReportId,
        /// pending, in_progress or resolved
        status: ReportStatus,
    },

    /// Submit a new report and show its triage
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Photo evidence (jpg, jpeg, png, webp or gif; at most 5 MiB)
        #[arg(long, value_name = "FILE")]
        photo: Option<PathBuf>,
    },

    /// Configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum PasswordCommand {
    /// Request a reset token
    Request {
        #[arg(long)]
        email: String,
    },
    /// Set a new password using a reset token
    Reset {
        #[arg(long)]
        email: String,
        #[arg(long)]
        token: String,
        /// New password (also: FIXIT_NEW_PASSWORD)
        #[arg(long, env = "FIXIT_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the resolved configuration as TOML
    Show,
}

/// One invocation's gateway, session and credential file.
pub struct Console {
    gateway: Arc<dyn ApiGateway>,
    reader: SessionReader,
    writer: SessionWriter,
    restored: Option<Credential>,
    credential_file: CredentialFile,
    config: FixitConfig,
}

impl Console {
    /// Opens a console against the configured HTTP endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub async fn open(config: &FixitConfig) -> Result<Self> {
        let gateway = HttpGateway::new(&config.api).context("cannot create HTTP client")?;
        let credential_file = CredentialFile::new(config.paths.credential_file_or_default());
        Ok(Self::restore(Arc::new(gateway), credential_file, config.clone()).await)
    }

    /// Builds a console, restoring any stored session.
    ///
    /// An unreadable credential file is logged and treated as logged out.
    pub async fn restore(
        gateway: Arc<dyn ApiGateway>,
        credential_file: CredentialFile,
        config: FixitConfig,
    ) -> Self {
        let restored = match credential_file.load().await {
            Ok(stored) => stored.map(|s| s.access_token),
            Err(e) => {
                warn!(
                    path = %credential_file.path().display(),
                    error = %e,
                    "Ignoring unreadable credential file"
                );
                None
            }
        };
        debug!(restored = restored.is_some(), "Console opened");

        let (reader, writer) = match restored.clone() {
            Some(credential) => SessionStore::restored(credential),
            None => SessionStore::new(),
        };

        Self {
            gateway,
            reader,
            writer,
            restored,
            credential_file,
            config,
        }
    }

    /// Runs `command`, then mirrors the session to disk if it changed.
    ///
    /// # Errors
    ///
    /// Returns the command's failure. A [`ControllerError`] is kept as the
    /// root cause so callers can downcast it.
    pub async fn run(&self, command: &Command, out: &mut impl Write) -> Result<()> {
        let result = self.dispatch(command, out).await;

        if self.reader.current_credential() == self.restored {
            return result;
        }
        match (result, persist_session(&self.reader, &self.credential_file).await) {
            (result, Ok(())) => result,
            (Ok(()), Err(e)) => Err(anyhow::Error::new(e).context("cannot update stored credential")),
            (Err(e), Err(persist)) => {
                warn!(error = %persist, "Cannot update stored credential");
                Err(e)
            }
        }
    }

    async fn dispatch(&self, command: &Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Login { email, password } => {
                self.account().login(email, password).await?;
                writeln!(out, "Logged in as {}", email.trim())?;
            }
            Command::Logout => {
                if self.account().logout() {
                    writeln!(out, "Logged out")?;
                } else {
                    writeln!(out, "No active session")?;
                }
            }
            Command::Register {
                email,
                password,
                confirm_password,
            } => {
                if password != confirm_password {
                    return Err(ControllerError::invalid_input("Passwords do not match").into());
                }
                self.account().register(email, password).await?;
                writeln!(
                    out,
                    "Account created for {}. Run `fixit login` to sign in.",
                    email.trim()
                )?;
            }
            Command::Password(PasswordCommand::Request { email }) => {
                self.request_reset(email, out).await?;
            }
            Command::Password(PasswordCommand::Reset {
                email,
                token,
                new_password,
            }) => {
                ResetHandshake::awaiting(Arc::clone(&self.gateway), email)
                    .confirm(token, new_password)
                    .await?;
                writeln!(out, "Password updated. Log in with your new password.")?;
            }
            Command::Reports => {
                let mut view = self.reports_view();
                view.enter().await?;
                write!(
                    out,
                    "{}",
                    render::report_list(view.reports(), view.role(), self.config.ui.verbose)
                )?;
            }
            Command::Status { id, status } => {
                self.set_status(*id, *status, out).await?;
            }
            Command::Create {
                title,
                description,
                photo,
            } => {
                self.create(title, description, photo.as_deref(), out).await?;
            }
            Command::Config(ConfigCommand::Show) => {
                write!(out, "{}", self.config.to_toml()?)?;
            }
        }
        Ok(())
    }

    fn account(&self) -> AccountFlow {
        AccountFlow::new(Arc::clone(&self.gateway), self.writer.clone())
    }

    fn reports_view(&self) -> ReportsView {
        ReportsView::new(Arc::clone(&self.gateway), self.writer.clone())
    }

    async fn request_reset(&self, email: &str, out: &mut impl Write) -> Result<()> {
        let mut handshake = self.account().password_reset();
        match handshake.request(email).await? {
            ResetStep::AwaitingReset {
                email,
                reset_token: Some(token),
            } => {
                writeln!(out, "Reset token: {token}")?;
                writeln!(
                    out,
                    "Run `fixit password reset --email {email} --token <TOKEN>` to set a new password."
                )?;
            }
            _ => {
                writeln!(out, "Reset requested. Check your email for the reset token.")?;
            }
        }
        Ok(())
    }

    async fn set_status(&self, id: ReportId, status: ReportStatus, out: &mut impl Write) -> Result<()> {
        let mut view = self.reports_view();
        view.enter().await?;
        if !view.role().is_elevated() {
            bail!("status changes require an elevated session");
        }
        view.set_status(id, status).await?;
        writeln!(out, "Report #{id} is now {}", status.label())?;
        Ok(())
    }

    async fn create(
        &self,
        title: &str,
        description: &str,
        photo: Option<&std::path::Path>,
        out: &mut impl Write,
    ) -> Result<()> {
        self.reader.require().map_err(ControllerError::from)?;

        let photo = match photo {
            Some(path) => Some(photo::encode_file(path).await?),
            None => None,
        };
        let draft = ReportDraft::new(title, description, photo).map_err(ControllerError::from)?;

        let mut view = CreationView::new(CreationFlow::new(
            Arc::clone(&self.gateway),
            self.reader.clone(),
        ));
        let triage = view.submit(&draft).await?;
        write!(out, "{}", render::triage(&triage))?;
        Ok(())
    }
}
