use crate::error::Result;
use crate::packages::traits::{PackageManager, path_arg};
use crate::utils::archive;
use crate::utils::command::CommandSpec;
use crate::utils::platform;
use std::path::{Path, PathBuf};

/// Archive suffixes pacman produces, tried in order
const PACKAGE_EXTENSIONS: &[&str] = &[
    ".pkg.tar.zst",
    ".pkg.tar.xz",
    ".pkg.tar.gz",
    ".pkg.tar.bz2",
    ".pkg.tar",
];

/// Arch Linux: `pacman -Sddw` into a private cache dir + `tar -x`
#[derive(Debug, Default)]
pub struct PacmanManager;

impl PacmanManager {
    pub fn new() -> Self {
        Self
    }
}

impl PackageManager for PacmanManager {
    fn name(&self) -> &'static str {
        "pacman"
    }

    fn version_separator(&self) -> &'static str {
        "="
    }

    fn default_options(&self) -> Vec<String> {
        vec!["--noconfirm".to_string(), "--quiet".to_string()]
    }

    fn probe_command(&self) -> &'static str {
        "pacman"
    }

    /// Needs root even for download-only sync operations
    fn build_download_command(
        &self,
        versioned_name: &str,
        _base_name: &str,
        staging_dir: &Path,
    ) -> Result<CommandSpec> {
        let mut argv = platform::elevation_prefix();
        argv.push("pacman".to_string());
        argv.extend(self.default_options());
        argv.push("-Sddw".to_string());
        argv.push("--cachedir".to_string());
        argv.push(path_arg(staging_dir));
        argv.push(versioned_name.to_string());
        Ok(CommandSpec::Argv(argv))
    }

    /// `<name>-*<ext>` per known extension; newest file wins, then lexical order
    fn locate_archive(&self, staging_dir: &Path, base_name: &str) -> Option<PathBuf> {
        let name = archive::escape(base_name);
        let patterns: Vec<String> = PACKAGE_EXTENSIONS
            .iter()
            .map(|ext| format!("{}-*{}", name, ext))
            .collect();
        archive::newest_match(staging_dir, &patterns)
    }

    fn build_extract_command(&self, archive: &Path, install_prefix: &Path) -> Result<CommandSpec> {
        Ok(CommandSpec::argv([
            "tar".to_string(),
            "-xf".to_string(),
            path_arg(archive),
            "-C".to_string(),
            path_arg(install_prefix),
        ]))
    }
}
