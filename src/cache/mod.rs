//! On-disk cache of extracted packages.
//!
//! ```text
//! <root>/downloads/<staging>/          per fetch attempt, always removed
//! <root>/<backend>/<name>=latest/      unpinned request
//! <root>/<backend>/<name>@<version>/   pinned request
//! <root>/<backend>/<subdir>/.yoinked   completion marker
//! ```

pub mod resolver;

use crate::constants::{DOWNLOADS_DIR_NAME, LATEST_TAG, MARKER_FILE_NAME, STAGING_DIR_PREFIX};
use crate::core::types::PackageSpec;
use crate::error::{Result, YoinkError};
use crate::utils::sanitize::cache_component;
use std::fs;
use std::path::{Path, PathBuf};

pub use resolver::{CacheDecision, DiscardReason, resolve};

/// Path derivation for one cache root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.root.join(DOWNLOADS_DIR_NAME)
    }

    pub fn backend_dir(&self, backend: &str) -> PathBuf {
        self.root.join(backend)
    }

    /// Persistent prefix for `spec`. Pinned and unpinned requests never share a key.
    pub fn install_prefix(&self, backend: &str, spec: &PackageSpec) -> PathBuf {
        let name = cache_component(spec.name());
        let subdir = match spec.version() {
            Some(version) => format!("{}@{}", name, cache_component(version)),
            None => format!("{}{}", name, LATEST_TAG),
        };
        self.backend_dir(backend).join(subdir)
    }

    /// Scratch directory for one fetch attempt, unique per process and prefix
    pub fn staging_dir(&self, backend: &str, spec: &PackageSpec, prefix: &Path) -> PathBuf {
        let prefix_name = prefix
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir_name = format!(
            "{}_{}_{}_{}_{}_{}",
            STAGING_DIR_PREFIX,
            backend,
            cache_component(spec.name()),
            cache_component(spec.version_label()),
            std::process::id(),
            prefix_name
        );
        self.downloads_dir().join(dir_name)
    }

    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| YoinkError::io(&self.root, e))
    }

    /// Remove everything under the root and recreate it empty.
    /// Returns whether the root existed beforehand.
    pub fn purge(&self) -> Result<bool> {
        let existed = self.root.exists();
        if existed {
            fs::remove_dir_all(&self.root).map_err(|e| YoinkError::io(&self.root, e))?;
        }
        self.ensure_root()?;
        Ok(existed)
    }
}

pub fn marker_path(prefix: &Path) -> PathBuf {
    prefix.join(MARKER_FILE_NAME)
}

/// Prefix exists and carries the completion marker
pub fn is_complete(prefix: &Path) -> bool {
    prefix.is_dir() && marker_path(prefix).is_file()
}

pub fn write_marker(prefix: &Path) -> Result<()> {
    let marker = marker_path(prefix);
    fs::File::create(&marker)
        .map(|_| ())
        .map_err(|e| YoinkError::io(marker, e))
}

/// Remove a directory tree, ignoring failures. Returns whether it is gone.
pub fn remove_quietly(path: &Path) -> bool {
    if !path.exists() {
        return true;
    }
    match fs::remove_dir_all(path) {
        Ok(()) => true,
        Err(e) => {
            crate::ui::verbose(&format!("Could not remove {}: {}", path.display(), e));
            false
        }
    }
}
