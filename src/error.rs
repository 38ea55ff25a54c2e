use std::path::PathBuf;
use thiserror::Error;

/// Maximum characters of captured output shown outside verbose mode
pub const ERROR_EXCERPT_LEN: usize = 200;

/// Exit code for "backend found, command located, but it could not be executed"
pub const EXIT_EXEC_FAILED: i32 = 127;

/// Exit code after Ctrl-C (128 + SIGINT)
pub const EXIT_INTERRUPTED: i32 = 130;

/// Captured result of a package manager command that exited unsuccessfully
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandFailure {
    pub command: String,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandFailure {
    /// First non-empty stream, trimmed. Stderr wins over stdout.
    pub fn summary(&self) -> Option<&str> {
        [self.stderr.trim(), self.stdout.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
    }

    /// Summary truncated to `limit` characters, with a trailing ellipsis when cut
    pub fn excerpt(&self, limit: usize) -> Option<String> {
        self.summary().map(|summary| truncate(summary, limit))
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let cut: String = text.chars().take(limit).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[derive(Error, Debug)]
pub enum YoinkError {
    #[error("No supported package manager ({}) found or functional on this system", tried.join(", "))]
    NoBackendAvailable { tried: Vec<String> },

    #[error("The line snapped while downloading {package}")]
    DownloadFailed {
        package: String,
        failure: CommandFailure,
    },

    #[error("The line came back empty! (No archive for {package} in {})", staging_dir.display())]
    ArchiveNotFound {
        package: String,
        staging_dir: PathBuf,
        found: Vec<String>,
    },

    #[error("Failed to unpack {package}")]
    ExtractionFailed {
        package: String,
        failure: CommandFailure,
    },

    #[error("Command '{command}' (from package '{package}') not found in {} after yoinking", prefix.display())]
    CommandNotFound {
        command: String,
        package: String,
        prefix: PathBuf,
    },

    #[error("Failed to execute '{command}' (from {}): {source}", path.display())]
    ExecFailed {
        command: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid package spec: {0}")]
    InvalidPackageSpec(String),

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Path resolution or validation error
    #[error("Path error: {0}")]
    PathError(String),

    #[error("Operation cancelled by user")]
    Interrupted,

    #[error("{0}")]
    Other(String),
}

impl YoinkError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Process exit code reported for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ExecFailed { .. } => EXIT_EXEC_FAILED,
            Self::Interrupted => EXIT_INTERRUPTED,
            _ => 1,
        }
    }

    /// Captured subprocess output, if the error came from a failed command
    pub fn command_failure(&self) -> Option<&CommandFailure> {
        match self {
            Self::DownloadFailed { failure, .. } | Self::ExtractionFailed { failure, .. } => {
                Some(failure)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, YoinkError>;
