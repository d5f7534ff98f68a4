//! Layered console configuration.
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌──────────────────────────────────────────┐
//! │  1. CLI flags (ConfigResolver)           │
//! ├──────────────────────────────────────────┤
//! │  2. Environment Variables (FIXIT_*)      │
//! ├──────────────────────────────────────────┤
//! │  3. Project Config (.fixit/config.toml)  │
//! ├──────────────────────────────────────────┤
//! │  4. Global Config (~/.fixit/config.toml) │
//! ├──────────────────────────────────────────┤
//! │  5. Default Values                       │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Directory Structure
//!
//! ```text
//! ~/.fixit/
//! ├── config.toml          # Global configuration
//! ├── credential.json      # Stored access token (0600)
//! └── logs/
//!     └── fixit.log        # Present when file logging is enabled
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `FIXIT_DEBUG` | `debug` | bool |
//! | `FIXIT_VERBOSE` | `ui.verbose` | bool |
//! | `FIXIT_COLOR` | `ui.color` | bool |
//! | `FIXIT_API_URL` | `api.base_url` | String |
//! | `FIXIT_TIMEOUT_SECS` | `api.timeout_secs` | u64 |
//! | `FIXIT_CREDENTIAL_PATH` | `paths.credential_file` | PathBuf |
//! | `FIXIT_LOG_FILE` | `logging.file_path` (enables file logging) | PathBuf |
//! | `FIXIT_LOG_LEVEL` | `logging.file_level` | String |
//!
//! # Example Configuration
//!
//! ```toml
//! debug = false
//!
//! [api]
//! base_url = "https://fixit.example.org"
//! timeout_secs = 15
//!
//! [paths]
//! credential_file = "~/.fixit/credential.json"
//!
//! [ui]
//! verbose = false
//! color = true
//!
//! [logging]
//! file = true
//! file_level = "info"
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::{ConfigResolver, DefaultResolver};
pub use types::{ApiConfig, FixitConfig, LoggingConfig, PathsConfig, UiConfig};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".fixit")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".fixit";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
