use crate::constants::BIN_DIRS;
use nix::unistd::{AccessFlags, access};
use std::path::{Path, PathBuf};

/// Directories searched for executables, in priority order.
/// The prefix root comes last.
pub fn search_dirs(prefix: &Path) -> Vec<PathBuf> {
    BIN_DIRS
        .iter()
        .map(|dir| prefix.join(dir))
        .chain(std::iter::once(prefix.to_path_buf()))
        .collect()
}

/// Find `command_name` in the conventional bin directories of `prefix`.
///
/// Exact, case-sensitive name match; no recursion. The file must be a regular
/// file executable by the current user.
pub fn find_executable_in_prefix(prefix: &Path, command_name: &str) -> Option<PathBuf> {
    if command_name.is_empty() || command_name.contains('/') {
        return None;
    }

    search_dirs(prefix)
        .into_iter()
        .filter(|dir| dir.is_dir())
        .map(|dir| dir.join(command_name))
        .find(|candidate| is_executable_file(candidate))
        .map(|found| std::fs::canonicalize(&found).unwrap_or(found))
}

pub fn is_executable_file(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}
