//! Decides whether an existing prefix can be reused before any fetch.

use crate::cache::{is_complete, marker_path};
use crate::core::locator::find_executable_in_prefix;
use crate::core::types::PackageSpec;
use crate::error::{Result, YoinkError};
use crate::ui;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Pinned requests are always refetched
    PinnedVersion,
    /// Marker present but the command is not in the prefix
    MissingExecutable,
    /// No marker: a previous attempt was interrupted
    Incomplete,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::PinnedVersion => "specific version requested",
            Self::MissingExecutable => "cached package does not contain the command",
            Self::Incomplete => "previous download was incomplete",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDecision {
    /// Use the executable already in the prefix
    Reuse(PathBuf),
    /// Prefix absent (or just discarded); a fetch is required
    Fetch { discarded: Option<DiscardReason> },
}

impl CacheDecision {
    pub fn needs_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// Classify `prefix` for `spec` and remove it when it must not be reused.
///
/// Fails if a discarded prefix cannot be removed, so a fetch never extracts
/// over stale files.
pub fn resolve(spec: &PackageSpec, prefix: &Path, command: &str) -> Result<CacheDecision> {
    if !prefix.exists() {
        return Ok(CacheDecision::Fetch { discarded: None });
    }

    let reason = if spec.is_pinned() {
        DiscardReason::PinnedVersion
    } else if !is_complete(prefix) {
        DiscardReason::Incomplete
    } else {
        match find_executable_in_prefix(prefix, command) {
            Some(path) => {
                ui::verbose(&format!("Cache hit: {}", prefix.display()));
                return Ok(CacheDecision::Reuse(path));
            }
            None => DiscardReason::MissingExecutable,
        }
    };

    ui::verbose(&format!(
        "Discarding {} ({})",
        prefix.display(),
        reason
    ));
    discard(prefix)?;
    Ok(CacheDecision::Fetch {
        discarded: Some(reason),
    })
}

/// The marker goes first so a partial removal never looks complete
fn discard(prefix: &Path) -> Result<()> {
    let marker = marker_path(prefix);
    if marker.is_file() {
        fs::remove_file(&marker).map_err(|e| YoinkError::io(&marker, e))?;
    }
    fs::remove_dir_all(prefix).map_err(|e| YoinkError::io(prefix, e))
}
