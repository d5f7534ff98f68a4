//! FixIt console: report issues to the community service and triage them.
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`FIXIT_*`)
//! 3. Project config (`.fixit/config.toml` in the project root)
//! 4. Global config (`~/.fixit/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `FIXIT_API_URL`: Report service base URL
//! - `FIXIT_TIMEOUT_SECS`: Request timeout
//! - `FIXIT_CREDENTIAL_PATH`: Where the session token is kept
//! - `FIXIT_PASSWORD`: Password for `login` and `register`
//! - `FIXIT_LOG_FILE` / `FIXIT_LOG_LEVEL`: File logging

mod commands;
mod photo;
mod render;
mod tracing_writer;

use anyhow::Result;
use clap::Parser;
use commands::{Command, Console};
use fixit_runtime::config::{ConfigError, ConfigLoader, ConfigResolver, FixitConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// FixIt console
#[derive(Parser, Debug)]
#[command(name = "fixit")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    project: Option<PathBuf>,

    /// Report service base URL (also: FIXIT_API_URL)
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Credential file path (also: FIXIT_CREDENTIAL_PATH)
    #[arg(long, value_name = "PATH", global = true)]
    credential_file: Option<PathBuf>,

    /// Override log file directory path (also: FIXIT_LOG_FILE)
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    /// Override file log level (also: FIXIT_LOG_LEVEL, default: debug)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// CLI-based configuration resolver.
///
/// Merges file/env config via [`ConfigLoader`] and applies CLI argument
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    project_root: PathBuf,
    debug: bool,
    verbose: bool,
    api_url: Option<String>,
    credential_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        Self {
            project_root,
            debug: args.debug,
            verbose: args.verbose,
            api_url: args.api_url.clone(),
            credential_file: args.credential_file.clone(),
            log_file: args.log_file.clone(),
            log_level: args.log_level.clone(),
        }
    }

    fn apply_overrides(&self, config: &mut FixitConfig) {
        if self.debug {
            config.debug = true;
        }
        if self.verbose {
            config.ui.verbose = true;
        }
        if let Some(ref url) = self.api_url {
            config.api.base_url.clone_from(url);
        }
        if let Some(ref p) = self.credential_file {
            config.paths.credential_file = Some(p.clone());
        }
        if let Some(ref p) = self.log_file {
            config.logging.file = true;
            config.logging.file_path = Some(p.clone());
        }
        if let Some(ref level) = self.log_level {
            config.logging.file_level.clone_from(level);
        }
    }
}

impl ConfigResolver for CliConfigResolver {
    fn resolve(&self) -> Result<FixitConfig, ConfigError> {
        let mut config = ConfigLoader::new()
            .with_project_root(&self.project_root)
            .load()?;

        // CLI args override (highest priority)
        self.apply_overrides(&mut config);

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let resolver = CliConfigResolver::from_args(&args);

    let config = resolver
        .resolve()
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    init_tracing(&args, &config);

    info!(path = %resolver.project_root.display(), "Project root");
    info!(api = %config.api.normalized_base_url(), "Report service");

    let console = Console::open(&config).await?;
    let mut stdout = std::io::stdout();
    console.run(&args.command, &mut stdout).await
}

/// Installs independent terminal and file layers.
///
/// Terminal filter: --debug > --verbose > RUST_LOG env > default "warn".
/// File filter: `logging.file_level`, independent of the terminal.
fn init_tracing(args: &Args, config: &FixitConfig) {
    let terminal_filter = if args.debug || config.debug {
        EnvFilter::new("debug,hyper=warn,h2=warn,reqwest=warn,rustls=warn,tokio=warn")
    } else if config.ui.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let terminal_layer = fmt::layer()
        .with_target(false)
        .with_ansi(config.ui.color)
        .with_writer(std::io::stderr);

    let log_file = if config.logging.file {
        open_log_file(&config.logging.resolved_file_path())
    } else {
        None
    };

    if let Some(file) = log_file {
        let file_filter = EnvFilter::new(config.logging.file_filter_directive());
        let file_layer = fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(tracing_writer::FileMakeWriter::new(file));

        tracing_subscriber::registry()
            .with(terminal_layer.with_filter(terminal_filter))
            .with(file_layer.with_filter(file_filter))
            .init();

        info!(
            path = %config.logging.resolved_file_path().join(LOG_FILE_NAME).display(),
            level = %config.logging.file_level,
            "File logging enabled"
        );
    } else {
        tracing_subscriber::registry()
            .with(terminal_layer.with_filter(terminal_filter))
            .init();
    }
}

const LOG_FILE_NAME: &str = "fixit.log";

/// Opens the persistent log file in the given directory.
///
/// Creates `<log_dir>/fixit.log` in append mode.
/// Returns `None` if the directory/file cannot be created (non-fatal).
fn open_log_file(log_dir: &Path) -> Option<Arc<parking_lot::Mutex<std::fs::File>>> {
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!(
            "Warning: cannot create log directory {}: {e}",
            log_dir.display()
        );
        return None;
    }

    let log_path = log_dir.join(LOG_FILE_NAME);

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => Some(Arc::new(parking_lot::Mutex::new(file))),
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {e}", log_path.display());
            None
        }
    }
}
