//! Error reporting with actionable suggestions.
//!
//! Non-verbose runs show a short excerpt of package manager output; verbose
//! runs show the failed command and everything it printed.

use crate::error::{CommandFailure, ERROR_EXCERPT_LEN, YoinkError};
use crate::ui;
use colored::Colorize;

/// Extension trait to add suggestions to errors
pub trait ErrorSuggestions {
    /// Get a helpful suggestion for this error
    fn suggestion(&self) -> Option<String>;

    /// Details below the headline, depending on verbosity
    fn details(&self, verbose: bool) -> Vec<String>;
}

impl ErrorSuggestions for YoinkError {
    fn suggestion(&self) -> Option<String> {
        match self {
            YoinkError::NoBackendAvailable { .. } => Some(format!(
                "yoink needs apt-get, dnf or pacman on PATH\nCheck with: {}",
                "apt-get --version".cyan()
            )),
            YoinkError::ArchiveNotFound { .. } => Some(
                "The package manager reported success but produced no matching archive.\n\
                 Check the package name, or try a different version."
                    .to_string(),
            ),
            YoinkError::CommandNotFound { package, .. } => Some(format!(
                "Searched the standard bin locations within the prefix.\n\
                 Pick the executable with: {}",
                format!("yoink -c <command> {}", package).cyan()
            )),
            YoinkError::InvalidPackageSpec(_) => Some(format!(
                "Package specs look like {} or {}",
                "cowsay".cyan(),
                "htop@3.3.0".cyan()
            )),
            YoinkError::ConfigError(msg) if msg.contains("KDL") => Some(format!(
                "Check your KDL syntax at {}",
                "https://kdl.dev".cyan()
            )),
            YoinkError::SystemCommandFailed { reason, .. } if reason.contains("timed out") => {
                Some("Raise or disable 'command_timeout' in settings.kdl".to_string())
            }
            _ => None,
        }
    }

    fn details(&self, verbose: bool) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(failure) = self.command_failure() {
            lines.extend(failure_details(failure, verbose));
        }

        if let YoinkError::ArchiveNotFound { found, .. } = self
            && verbose
        {
            lines.push(format!("Files in staging directory: {:?}", found));
        }

        lines
    }
}

fn failure_details(failure: &CommandFailure, verbose: bool) -> Vec<String> {
    if verbose {
        let mut lines = vec![format!("Failed command: {}", failure.command)];
        if let Some(code) = failure.code {
            lines.push(format!("Exit code: {}", code));
        }
        if !failure.stdout.trim().is_empty() {
            lines.push(format!("Stdout:\n{}", failure.stdout.trim_end()));
        }
        if !failure.stderr.trim().is_empty() {
            lines.push(format!("Stderr:\n{}", failure.stderr.trim_end()));
        }
        return lines;
    }

    let mut lines = match failure.excerpt(ERROR_EXCERPT_LEN) {
        Some(excerpt) => vec![format!("PM Error: {}", excerpt)],
        None => vec!["No detailed error output from command.".to_string()],
    };
    lines.push("(Run with --verbose for full command output)".to_string());
    lines
}

/// Print an error, its details and its suggestion to stderr
pub fn report(error: &YoinkError) {
    ui::error(&error.to_string());

    for line in error.details(ui::is_verbose()) {
        eprintln!("{}", line);
    }

    if let Some(suggestion) = error.suggestion() {
        eprintln!("\n{}", suggestion);
    }
}
