//! User settings read from `settings.kdl`.
//!
//! ```kdl
//! cache_dir "~/.cache/yoink"
//! backends "dnf" "apt"
//! color "never"
//! command_timeout 600
//! verbose #false
//! ```

use crate::error::{Result, YoinkError};
use crate::ui::ColorChoice;
use crate::utils::paths;
use kdl::{KdlDocument, KdlNode, KdlValue};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const VALID_KEYS: &[&str] = &["cache_dir", "backends", "color", "command_timeout", "verbose"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub cache_dir: Option<PathBuf>,
    /// Restricts and orders backend detection; empty means all
    pub backends: Vec<String>,
    pub color: Option<ColorChoice>,
    /// `None` waits forever
    pub command_timeout: Option<Duration>,
    pub verbose: bool,
}

impl Settings {
    /// Load from the default location (or `YOINK_CONFIG`)
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::settings_file()?)
    }

    /// A missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| YoinkError::io(path, e))?;
        Self::parse(&content).map_err(|e| match e {
            YoinkError::ConfigError(msg) => {
                YoinkError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        let doc: KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
            let err_msg = e.to_string();
            let hint = if err_msg.contains("unexpected end of file") {
                "\nHint: You might be missing a closing quote or brace."
            } else {
                "\nHint: Settings use the form: key \"value\""
            };
            YoinkError::ConfigError(format!("KDL parsing error: {}{}", err_msg, hint))
        })?;

        let mut settings = Self::default();

        for node in doc.nodes() {
            match node.name().value() {
                "cache_dir" => {
                    settings.cache_dir = Some(PathBuf::from(single_string(node)?));
                }
                "backends" => {
                    settings.backends = node
                        .entries()
                        .iter()
                        .map(|entry| {
                            entry.value().as_string().map(str::to_string).ok_or_else(|| {
                                invalid(node, "expected backend names as strings")
                            })
                        })
                        .collect::<Result<_>>()?;
                }
                "color" => {
                    let value = single_string(node)?;
                    settings.color = Some(ColorChoice::parse(&value).ok_or_else(|| {
                        invalid(node, "valid values: auto, always, never")
                    })?);
                }
                "command_timeout" => {
                    let secs = single_value(node)?
                        .as_integer()
                        .filter(|n| *n >= 0)
                        .and_then(|n| u64::try_from(n).ok())
                        .ok_or_else(|| invalid(node, "expected a number of seconds"))?;
                    settings.command_timeout = (secs > 0).then(|| Duration::from_secs(secs));
                }
                "verbose" => {
                    settings.verbose = single_value(node)?
                        .as_bool()
                        .ok_or_else(|| invalid(node, "expected #true or #false"))?;
                }
                other => {
                    return Err(YoinkError::ConfigError(format!(
                        "Unknown setting: '{}'. Valid settings: {}",
                        other,
                        VALID_KEYS.join(", ")
                    )));
                }
            }
        }

        Ok(settings)
    }
}

fn invalid(node: &KdlNode, expected: &str) -> YoinkError {
    YoinkError::ConfigError(format!(
        "Invalid value for '{}': {}",
        node.name().value(),
        expected
    ))
}

fn single_value(node: &KdlNode) -> Result<&KdlValue> {
    match node.entries() {
        [entry] => Ok(entry.value()),
        _ => Err(invalid(node, "expected exactly one value")),
    }
}

fn single_string(node: &KdlNode) -> Result<String> {
    single_value(node)?
        .as_string()
        .map(str::to_string)
        .ok_or_else(|| invalid(node, "expected a string"))
}
