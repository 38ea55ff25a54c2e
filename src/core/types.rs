use crate::error::Result;
use crate::utils::sanitize;
use std::fmt;
use std::str::FromStr;

/// Split `name[@version]` on the last `@`.
///
/// An empty version (`"foo@"`) means the same as no version.
pub fn parse_package_spec(spec: &str) -> (String, Option<String>) {
    match spec.rsplit_once('@') {
        Some((name, version)) if !version.is_empty() => {
            (name.to_string(), Some(version.to_string()))
        }
        Some((name, _)) => (name.to_string(), None),
        None => (spec.to_string(), None),
    }
}

/// A requested package, optionally pinned to a version
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct PackageSpec {
    name: String,
    version: Option<String>,
}

impl PackageSpec {
    /// Parse and validate a user-supplied token
    pub fn parse(token: &str) -> Result<Self> {
        let (name, version) = parse_package_spec(token);
        Self::new(name, version)
    }

    pub fn new(name: impl Into<String>, version: Option<String>) -> Result<Self> {
        let name = name.into();
        sanitize::validate_package_name(&name)?;
        if let Some(version) = &version {
            sanitize::validate_version(version)?;
        }
        Ok(Self { name, version })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_pinned(&self) -> bool {
        self.version.is_some()
    }

    /// Query string for a backend, e.g. `htop=3.3.0` or `htop-3.3.0`
    pub fn versioned_name(&self, separator: &str) -> String {
        match &self.version {
            Some(version) => format!("{}{}{}", self.name, separator, version),
            None => self.name.clone(),
        }
    }

    /// `version` or `latest`, used in staging directory names
    pub fn version_label(&self) -> &str {
        self.version.as_deref().unwrap_or("latest")
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for PackageSpec {
    type Err = crate::error::YoinkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
