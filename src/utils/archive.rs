//! Locating downloaded package archives inside a staging directory.

use glob::{Pattern, glob};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Regular files in `dir` whose name matches `file_pattern`, in lexical order.
///
/// `file_pattern` is a glob on the file name only. Literal parts such as the
/// package name must be escaped with [`escape`] by the caller.
pub fn matching_files(dir: &Path, file_pattern: &str) -> Vec<PathBuf> {
    let full = format!("{}/{}", Pattern::escape(&dir.to_string_lossy()), file_pattern);
    let Ok(paths) = glob(&full) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = paths.flatten().filter(|p| p.is_file()).collect();
    files.sort();
    files
}

/// First match across `patterns`, trying each in turn; lexical tie-break
pub fn first_match(dir: &Path, patterns: &[String]) -> Option<PathBuf> {
    patterns
        .iter()
        .find_map(|pattern| matching_files(dir, pattern).into_iter().next())
}

/// Most recently modified match across `patterns`, trying each in turn.
/// Equal modification times fall back to lexical order.
pub fn newest_match(dir: &Path, patterns: &[String]) -> Option<PathBuf> {
    patterns.iter().find_map(|pattern| {
        let files = matching_files(dir, pattern);
        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for file in files {
            let modified = file
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            match &newest {
                Some((best, _)) if *best >= modified => {}
                _ => newest = Some((modified, file)),
            }
        }
        newest.map(|(_, path)| path)
    })
}

/// Escape a literal (e.g. a package name) for use inside a file pattern
pub fn escape(literal: &str) -> String {
    Pattern::escape(literal)
}

/// Names of regular files in `dir`, for diagnostics
pub fn list_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
