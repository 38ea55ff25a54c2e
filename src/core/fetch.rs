//! Download, locate and extract one package into its install prefix.
//!
//! A fetch either leaves a complete prefix (marker written) or nothing at
//! all: every failure removes the prefix, and the staging directory is
//! removed whatever the outcome.

use crate::cache::{self, CacheLayout};
use crate::core::types::PackageSpec;
use crate::error::{Result, YoinkError};
use crate::packages::PackageManager;
use crate::ui;
use crate::utils::archive;
use crate::utils::command::{CommandRunner, CommandSpec, OutputMode};
use std::fs;
use std::path::Path;

pub struct Fetcher<'a> {
    backend: &'a dyn PackageManager,
    runner: &'a dyn CommandRunner,
    layout: &'a CacheLayout,
    output: OutputMode,
}

impl<'a> Fetcher<'a> {
    pub fn new(
        backend: &'a dyn PackageManager,
        runner: &'a dyn CommandRunner,
        layout: &'a CacheLayout,
    ) -> Self {
        Self {
            backend,
            runner,
            layout,
            output: OutputMode::Captured,
        }
    }

    /// Stream package manager output instead of capturing it
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn fetch(&self, spec: &PackageSpec, prefix: &Path) -> Result<()> {
        let staging = self
            .layout
            .staging_dir(self.backend.name(), spec, prefix);

        let result = self.attempt(spec, prefix, &staging);

        if result.is_err() && prefix.exists() {
            ui::verbose(&format!(
                "Cleaning up failed attempt at {}",
                prefix.display()
            ));
            cache::remove_quietly(prefix);
        }
        cache::remove_quietly(&staging);

        result
    }

    fn attempt(&self, spec: &PackageSpec, prefix: &Path, staging: &Path) -> Result<()> {
        // A dead process with the same pid may have left this behind
        cache::remove_quietly(staging);
        fs::create_dir_all(staging).map_err(|e| YoinkError::io(staging, e))?;

        let versioned = self.backend.versioned_name(spec);
        ui::verbose(&format!("Reeling in the line (downloading {})", versioned));
        let download = self
            .backend
            .build_download_command(&versioned, spec.name(), staging)?;
        self.run_step(&download, Some(staging))
            .map_err(|failure| match failure {
                StepError::Failed(failure) => YoinkError::DownloadFailed {
                    package: spec.to_string(),
                    failure,
                },
                StepError::Fatal(e) => e,
            })?;

        let archive = self
            .backend
            .locate_archive(staging, spec.name())
            .ok_or_else(|| YoinkError::ArchiveNotFound {
                package: spec.to_string(),
                staging_dir: staging.to_path_buf(),
                found: archive::list_files(staging),
            })?;
        ui::verbose(&format!(
            "Got it! Archive: {}",
            archive.file_name().unwrap_or_default().to_string_lossy()
        ));

        fs::create_dir_all(prefix).map_err(|e| YoinkError::io(prefix, e))?;
        let extract = self.backend.build_extract_command(&archive, prefix)?;
        self.run_step(&extract, None)
            .map_err(|failure| match failure {
                StepError::Failed(failure) => YoinkError::ExtractionFailed {
                    package: spec.to_string(),
                    failure,
                },
                StepError::Fatal(e) => e,
            })?;

        cache::write_marker(prefix)
    }

    fn run_step(
        &self,
        command: &CommandSpec,
        cwd: Option<&Path>,
    ) -> std::result::Result<(), StepError> {
        ui::verbose(&format!("Running: {}", command.display()));
        let output = self
            .runner
            .run(command, cwd, self.output)
            .map_err(StepError::Fatal)?;

        if ui::was_interrupted() {
            return Err(StepError::Fatal(YoinkError::Interrupted));
        }
        if !output.success {
            return Err(StepError::Failed(output.into_failure(command)));
        }
        Ok(())
    }
}

enum StepError {
    /// Command ran and exited unsuccessfully
    Failed(crate::error::CommandFailure),
    /// Command could not run, or the run was cancelled
    Fatal(YoinkError),
}
