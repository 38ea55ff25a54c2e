//! Environment assembly and final hand-off to the located executable.
//!
//! PATH receives the conventional bin directories that exist inside the
//! prefix, then the prefix root only when it directly holds an executable.
//! LD_LIBRARY_PATH follows the same rule with library directories and any
//! shared object in the prefix root. Entries are deduplicated and prepended
//! to the inherited value; an empty inherited value adds no separator.

use crate::constants::{BIN_DIRS, LIB_DIRS};
use crate::core::locator::is_executable_file;
use crate::error::{Result, YoinkError};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const PATH_VAR: &str = "PATH";
pub const LIBRARY_PATH_VAR: &str = "LD_LIBRARY_PATH";

/// Everything needed to start the yoinked command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecPlan {
    pub command_name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Variables overriding the inherited environment
    pub env: Vec<(String, OsString)>,
}

impl ExecPlan {
    /// Build a plan against the current process environment
    pub fn new(prefix: &Path, command_name: &str, program: PathBuf, args: Vec<String>) -> Result<Self> {
        Self::with_env(prefix, command_name, program, args, |key| std::env::var_os(key))
    }

    pub fn with_env<F>(
        prefix: &Path,
        command_name: &str,
        program: PathBuf,
        args: Vec<String>,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut env = Vec::new();

        let bin_entries = bin_path_entries(prefix);
        if let Some(path) = prepend_paths(&bin_entries, lookup(PATH_VAR))? {
            env.push((PATH_VAR.to_string(), path));
        }

        let lib_entries = lib_path_entries(prefix);
        if let Some(path) = prepend_paths(&lib_entries, lookup(LIBRARY_PATH_VAR))? {
            env.push((LIBRARY_PATH_VAR.to_string(), path));
        }

        Ok(Self {
            command_name: command_name.to_string(),
            program,
            args,
            env,
        })
    }

    pub fn env_value(&self, key: &str) -> Option<&OsString> {
        self.env.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_os_str())));
        cmd
    }

    /// Replace the current process with the planned command.
    ///
    /// Only returns on failure.
    #[cfg(unix)]
    pub fn exec(self) -> Result<i32> {
        use std::os::unix::process::CommandExt;

        let source = self.command().exec();
        Err(YoinkError::ExecFailed {
            command: self.command_name,
            path: self.program,
            source,
        })
    }

    /// Spawn the planned command, wait, and return its exit code.
    #[cfg(not(unix))]
    pub fn exec(self) -> Result<i32> {
        match self.command().status() {
            Ok(status) => Ok(status.code().unwrap_or(1)),
            Err(source) => Err(YoinkError::ExecFailed {
                command: self.command_name,
                path: self.program,
                source,
            }),
        }
    }
}

/// Existing bin directories of the prefix, for PATH
pub fn bin_path_entries(prefix: &Path) -> Vec<PathBuf> {
    collect_entries(prefix, BIN_DIRS, |path| is_executable_file(path))
}

/// Existing library directories of the prefix, for LD_LIBRARY_PATH
pub fn lib_path_entries(prefix: &Path) -> Vec<PathBuf> {
    collect_entries(prefix, LIB_DIRS, |path| {
        path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(".so"))
    })
}

fn collect_entries<F>(prefix: &Path, dirs: &[&str], root_qualifies: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    let mut entries: Vec<PathBuf> = Vec::new();

    for dir in dirs {
        let candidate = prefix.join(dir);
        if candidate.is_dir() {
            push_unique(&mut entries, resolve(&candidate));
        }
    }

    if prefix.is_dir() && root_has_match(prefix, &root_qualifies) {
        push_unique(&mut entries, resolve(prefix));
    }

    entries
}

fn root_has_match<F>(prefix: &Path, qualifies: &F) -> bool
where
    F: Fn(&Path) -> bool,
{
    let Ok(read_dir) = fs::read_dir(prefix) else {
        return false;
    };
    read_dir
        .flatten()
        .any(|entry| qualifies(&entry.path()))
}

fn push_unique(entries: &mut Vec<PathBuf>, path: PathBuf) {
    if !entries.contains(&path) {
        entries.push(path);
    }
}

fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Prepend `entries` to an existing search-path value.
///
/// Returns `None` when there is nothing to add.
pub fn prepend_paths(entries: &[PathBuf], existing: Option<OsString>) -> Result<Option<OsString>> {
    if entries.is_empty() {
        return Ok(None);
    }

    let mut all: Vec<PathBuf> = entries.to_vec();
    if let Some(existing) = existing.filter(|v| !v.is_empty()) {
        all.extend(std::env::split_paths(&existing));
    }

    std::env::join_paths(all)
        .map(Some)
        .map_err(|e| YoinkError::PathError(format!("Cannot build search path: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn executable(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_path_gets_existing_bin_dirs_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let prefix = fs::canonicalize(tmp.path()).unwrap();
        executable(&prefix.join("usr/bin/foo"));
        fs::create_dir_all(prefix.join("bin")).unwrap();

        let plan = ExecPlan::with_env(
            &prefix,
            "foo",
            prefix.join("usr/bin/foo"),
            vec!["--moo".into()],
            |key| (key == PATH_VAR).then(|| OsString::from("/usr/bin:/bin")),
        )
        .unwrap();

        let expected = format!(
            "{}:{}:/usr/bin:/bin",
            prefix.join("bin").display(),
            prefix.join("usr/bin").display()
        );
        assert_eq!(plan.env_value(PATH_VAR), Some(&OsString::from(expected)));
        assert_eq!(plan.env_value(LIBRARY_PATH_VAR), None);
    }

    #[test]
    fn test_prefix_root_added_only_with_executable() {
        let tmp = tempfile::tempdir().unwrap();
        let prefix = fs::canonicalize(tmp.path()).unwrap();
        fs::write(prefix.join("README"), "docs").unwrap();
        assert!(bin_path_entries(&prefix).is_empty());

        executable(&prefix.join("foo"));
        assert_eq!(bin_path_entries(&prefix), vec![prefix.clone()]);
    }

    #[test]
    fn test_library_dirs_and_root_shared_objects() {
        let tmp = tempfile::tempdir().unwrap();
        let prefix = fs::canonicalize(tmp.path()).unwrap();
        fs::create_dir_all(prefix.join("usr/lib/x86_64-linux-gnu")).unwrap();
        fs::write(prefix.join("libfoo.so.1"), "").unwrap();

        let entries = lib_path_entries(&prefix);
        assert_eq!(
            entries,
            vec![
                prefix.join("usr/lib"),
                prefix.join("usr/lib/x86_64-linux-gnu"),
                prefix.clone()
            ]
        );
    }

    #[test]
    fn test_prepend_without_existing_value_has_no_trailing_separator() {
        let entries = vec![PathBuf::from("/p/bin")];
        assert_eq!(
            prepend_paths(&entries, None).unwrap(),
            Some(OsString::from("/p/bin"))
        );
        assert_eq!(
            prepend_paths(&entries, Some(OsString::new())).unwrap(),
            Some(OsString::from("/p/bin"))
        );
        assert_eq!(prepend_paths(&[], Some("/bin".into())).unwrap(), None);
    }
}
