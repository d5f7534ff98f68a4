//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use super::{default_config_dir, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use fixit_runtime::config::FixitConfig;
///
/// let config = FixitConfig::default();
/// assert!(!config.debug);
/// assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FixitConfig {
    /// Enable debug mode.
    pub debug: bool,

    /// Report service endpoint.
    pub api: ApiConfig,

    /// Path configuration.
    pub paths: PathsConfig,

    /// UI configuration.
    pub ui: UiConfig,

    /// Persistent log file configuration.
    pub logging: LoggingConfig,
}

impl FixitConfig {
    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default. This enables layered configuration.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.api.merge(&other.api);
        self.paths.merge(&other.paths);
        self.ui.merge(&other.ui);
        self.logging.merge(&other.logging);
    }

    /// Checks values that cannot be expressed in the type system.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unusable API endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()
    }
}

/// Report service endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.base_url != default.base_url {
            self.base_url.clone_from(&other.base_url);
        }
        if other.timeout_secs != default.timeout_secs {
            self.timeout_secs = other.timeout_secs;
        }
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validates the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the URL scheme is not
    /// http(s) or the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid_value(
                "api.base_url",
                format!("'{url}' must start with http:// or https://"),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "api.timeout_secs",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Path configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    /// Stored credential file.
    pub credential_file: Option<PathBuf>,
}

impl PathsConfig {
    fn merge(&mut self, other: &Self) {
        if other.credential_file.is_some() {
            self.credential_file.clone_from(&other.credential_file);
        }
    }

    /// Returns the credential file path, falling back to
    /// `~/.fixit/credential.json`.
    #[must_use]
    pub fn credential_file_or_default(&self) -> PathBuf {
        self.credential_file
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| default_config_dir().join("credential.json"))
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Verbose output mode.
    pub verbose: bool,

    /// Enable color output.
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            color: true,
        }
    }
}

impl UiConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.verbose != default.verbose {
            self.verbose = other.verbose;
        }
        if other.color != default.color {
            self.color = other.color;
        }
    }
}

/// Persistent log file configuration.
///
/// The file layer has its own level, independent of the terminal filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write logs to `<file_path>/fixit.log`.
    pub file: bool,

    /// Level directive for the file layer.
    pub file_level: String,

    /// Log directory. `None` means `~/.fixit/logs`.
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: false,
            file_level: "debug".into(),
            file_path: None,
        }
    }
}

impl LoggingConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.file != default.file {
            self.file = other.file;
        }
        if other.file_level != default.file_level {
            self.file_level.clone_from(&other.file_level);
        }
        if other.file_path.is_some() {
            self.file_path.clone_from(&other.file_path);
        }
    }

    /// Returns the log directory with `~` expanded.
    #[must_use]
    pub fn resolved_file_path(&self) -> PathBuf {
        self.file_path
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| default_config_dir().join("logs"))
    }

    /// Returns the `EnvFilter` directive for the file layer.
    ///
    /// HTTP and TLS internals stay at warn regardless of the chosen level.
    #[must_use]
    pub fn file_filter_directive(&self) -> String {
        format!(
            "{},hyper=warn,h2=warn,reqwest=warn,rustls=warn",
            self.file_level
        )
    }
}

/// Expands a leading `~` to the home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
