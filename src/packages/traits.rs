use crate::core::types::PackageSpec;
use crate::error::Result;
use crate::utils::command::CommandSpec;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// One native package manager that can fetch a package without installing it.
///
/// Implementations only build commands and inspect the staging directory;
/// running the commands is up to the caller.
pub trait PackageManager: Send + Sync {
    /// Short stable identifier, also the backend's cache directory name
    fn name(&self) -> &'static str;

    /// Token binding name and version in a query, e.g. `=` in `htop=3.3.0`
    fn version_separator(&self) -> &'static str;

    /// Options passed to every invocation of the package manager
    fn default_options(&self) -> Vec<String> {
        Vec::new()
    }

    /// Tool whose presence decides availability
    fn probe_command(&self) -> &'static str;

    fn probe_args(&self) -> Vec<String> {
        vec!["--version".to_string()]
    }

    /// On the search path and answering a trivial invocation successfully
    fn is_available(&self) -> bool {
        probe_tool(self.probe_command(), &self.probe_args())
    }

    /// Query string understood by this backend's download command
    fn versioned_name(&self, spec: &PackageSpec) -> String {
        spec.versioned_name(self.version_separator())
    }

    /// Command fetching the archive into `staging_dir` without installing it.
    /// Run with `staging_dir` as working directory.
    fn build_download_command(
        &self,
        versioned_name: &str,
        base_name: &str,
        staging_dir: &Path,
    ) -> Result<CommandSpec>;

    /// The archive produced by the download, if any
    fn locate_archive(&self, staging_dir: &Path, base_name: &str) -> Option<PathBuf>;

    /// Command unpacking `archive` into the existing `install_prefix`
    fn build_extract_command(&self, archive: &Path, install_prefix: &Path) -> Result<CommandSpec>;
}

/// `which` lookup followed by a trivial invocation that must exit 0
pub fn probe_tool(tool: &str, args: &[String]) -> bool {
    let Ok(path) = which::which(tool) else {
        return false;
    };

    Command::new(path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
