//! Configuration resolver trait for layered overrides.
//!
//! ```text
//! ConfigLoader.load()  →  FixitConfig (files + env)
//!                              │
//!                              ▼
//!                   ConfigResolver.resolve()  (adds CLI flags)
//!                              │
//!                              ▼
//!                     FixitConfig (final)
//! ```

use super::{ConfigError, ConfigLoader, FixitConfig};
use std::path::PathBuf;

/// Produces the final configuration for a run.
///
/// Implementors decide which [`ConfigLoader`] layers apply and add their own
/// overrides on top (command-line flags, test fixtures).
pub trait ConfigResolver {
    /// Resolves the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a layer cannot be loaded or the result
    /// fails validation.
    fn resolve(&self) -> Result<FixitConfig, ConfigError>;
}

/// Resolver that applies every loader layer and nothing else.
#[derive(Debug, Clone, Default)]
pub struct DefaultResolver {
    project_root: Option<PathBuf>,
}

impl DefaultResolver {
    /// Creates a resolver reading project config from `project_root`.
    #[must_use]
    pub fn with_project_root(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: Some(project_root.into()),
        }
    }
}

impl ConfigResolver for DefaultResolver {
    fn resolve(&self) -> Result<FixitConfig, ConfigError> {
        let mut loader = ConfigLoader::new();
        if let Some(ref root) = self.project_root {
            loader = loader.with_project_root(root);
        }
        let config = loader.load()?;
        config.validate()?;
        Ok(config)
    }
}
