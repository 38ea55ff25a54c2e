use crate::error::{Result, YoinkError};
use crate::project_identity::{
    CACHE_DIR_NAME, PROJECT_ORG, PROJECT_QUALIFIER, SETTINGS_FILE_BASENAME, env_key,
};
use directories::{ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORG, CACHE_DIR_NAME)
}

pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let user_dirs = UserDirs::new()
        .ok_or_else(|| YoinkError::PathError("Could not determine user home directory".to_string()))?;

    let home = user_dirs.home_dir();

    if path_str == "~" {
        return Ok(home.to_path_buf());
    }

    let stripped = path_str
        .strip_prefix("~/")
        .ok_or_else(|| YoinkError::PathError(format!("Invalid path format: {}", path_str)))?;

    Ok(home.join(stripped))
}

/// Expand `~` and make the path absolute without touching the filesystem
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let expanded = expand_home(path)?;
    std::path::absolute(&expanded).map_err(|e| YoinkError::io(expanded, e))
}

pub fn config_dir() -> Result<PathBuf> {
    let proj = project_dirs()
        .ok_or_else(|| YoinkError::PathError("Could not determine config directory".to_string()))?;
    Ok(proj.config_dir().to_path_buf())
}

/// Settings file location, overridable with `YOINK_CONFIG`
pub fn settings_file() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(env_key("CONFIG")).filter(|v| !v.is_empty()) {
        return absolutize(Path::new(&path));
    }
    Ok(config_dir()?.join(SETTINGS_FILE_BASENAME))
}

/// Cache root used when nothing else is configured
pub fn default_cache_root() -> PathBuf {
    project_dirs()
        .map(|proj| proj.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(CACHE_DIR_NAME))
}
