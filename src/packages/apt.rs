use crate::error::Result;
use crate::packages::traits::{PackageManager, path_arg};
use crate::utils::archive;
use crate::utils::command::CommandSpec;
use std::path::{Path, PathBuf};

/// Debian/Ubuntu: `apt-get download` + `dpkg -x`
#[derive(Debug, Default)]
pub struct AptManager;

impl AptManager {
    pub fn new() -> Self {
        Self
    }
}

impl PackageManager for AptManager {
    fn name(&self) -> &'static str {
        "apt"
    }

    fn version_separator(&self) -> &'static str {
        "="
    }

    fn probe_command(&self) -> &'static str {
        "apt-get"
    }

    fn build_download_command(
        &self,
        versioned_name: &str,
        _base_name: &str,
        staging_dir: &Path,
    ) -> Result<CommandSpec> {
        // apt-get download writes into the working directory; the cache option
        // keeps any partial files inside the staging dir as well.
        let mut argv = vec!["apt-get".to_string()];
        argv.extend(self.default_options());
        argv.push("download".to_string());
        argv.push("-o".to_string());
        argv.push(format!("Dir::Cache::archives={}", path_arg(staging_dir)));
        argv.push(versioned_name.to_string());
        Ok(CommandSpec::Argv(argv))
    }

    /// `<name>_*.deb`, then `<name>*.deb`; first in lexical order
    fn locate_archive(&self, staging_dir: &Path, base_name: &str) -> Option<PathBuf> {
        let name = archive::escape(base_name);
        archive::first_match(
            staging_dir,
            &[format!("{}_*.deb", name), format!("{}*.deb", name)],
        )
    }

    fn build_extract_command(&self, archive: &Path, install_prefix: &Path) -> Result<CommandSpec> {
        Ok(CommandSpec::argv([
            "dpkg".to_string(),
            "-x".to_string(),
            path_arg(archive),
            path_arg(install_prefix),
        ]))
    }
}
