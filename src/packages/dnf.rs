use crate::error::{Result, YoinkError};
use crate::packages::traits::{PackageManager, path_arg};
use crate::utils::archive;
use crate::utils::command::CommandSpec;
use std::path::{Path, PathBuf};

/// Fedora/RHEL: `dnf download` + `rpm2cpio | cpio`
#[derive(Debug, Default)]
pub struct DnfManager;

impl DnfManager {
    pub fn new() -> Self {
        Self
    }
}

fn quote(path: &Path) -> Result<String> {
    let raw = path_arg(path);
    shlex::try_quote(&raw)
        .map(|q| q.into_owned())
        .map_err(|e| YoinkError::PathError(format!("Cannot quote '{}': {}", raw, e)))
}

impl PackageManager for DnfManager {
    fn name(&self) -> &'static str {
        "dnf"
    }

    fn version_separator(&self) -> &'static str {
        "-"
    }

    fn default_options(&self) -> Vec<String> {
        vec![
            "--setopt=install_weak_deps=False".to_string(),
            "--quiet".to_string(),
        ]
    }

    fn probe_command(&self) -> &'static str {
        "dnf"
    }

    fn build_download_command(
        &self,
        versioned_name: &str,
        _base_name: &str,
        staging_dir: &Path,
    ) -> Result<CommandSpec> {
        let mut argv = vec!["dnf".to_string()];
        argv.extend(self.default_options());
        argv.push("download".to_string());
        argv.push(format!("--destdir={}", path_arg(staging_dir)));
        argv.push(versioned_name.to_string());
        Ok(CommandSpec::Argv(argv))
    }

    /// `<name>-*.rpm`, then `<name>*.rpm`; first in lexical order
    fn locate_archive(&self, staging_dir: &Path, base_name: &str) -> Option<PathBuf> {
        let name = archive::escape(base_name);
        archive::first_match(
            staging_dir,
            &[format!("{}-*.rpm", name), format!("{}*.rpm", name)],
        )
    }

    fn build_extract_command(&self, archive: &Path, install_prefix: &Path) -> Result<CommandSpec> {
        Ok(CommandSpec::ShellLine(format!(
            "rpm2cpio {} | (cd {} && cpio -idum --quiet)",
            quote(archive)?,
            quote(install_prefix)?
        )))
    }
}
