//! Effective configuration for one run: flags over environment over settings.

use crate::config::settings::Settings;
use crate::error::Result;
use crate::project_identity::env_key;
use crate::ui::ColorChoice;
use crate::utils::paths;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub cache_dir: Option<PathBuf>,
    pub backend: Option<String>,
    pub color: Option<ColorChoice>,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Absolute, fixed for the whole run
    pub cache_root: PathBuf,
    /// Backend restriction in detection order; empty means all
    pub backends: Vec<String>,
    pub color: ColorChoice,
    pub command_timeout: Option<Duration>,
    pub verbose: bool,
}

impl RuntimeConfig {
    pub fn resolve(overrides: &Overrides, settings: &Settings) -> Result<Self> {
        Self::resolve_with_env(overrides, settings, |key| std::env::var_os(key))
    }

    pub fn resolve_with_env<F>(overrides: &Overrides, settings: &Settings, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let non_empty = |key: &str| env(&env_key(key)).filter(|v| !v.is_empty());

        let cache_root = match overrides
            .cache_dir
            .clone()
            .or_else(|| non_empty("CACHE_DIR").map(PathBuf::from))
            .or_else(|| settings.cache_dir.clone())
        {
            Some(dir) => paths::absolutize(&dir)?,
            None => paths::absolutize(&paths::default_cache_root())?,
        };

        let backends = match overrides
            .backend
            .clone()
            .or_else(|| non_empty("BACKEND").map(|v| v.to_string_lossy().into_owned()))
        {
            Some(backend) => vec![backend],
            None => settings.backends.clone(),
        };

        Ok(Self {
            cache_root,
            backends,
            color: overrides.color.or(settings.color).unwrap_or_default(),
            command_timeout: settings.command_timeout,
            verbose: overrides.verbose || settings.verbose,
        })
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }
}
