//! Input sanitization utilities
//!
//! Package names and versions end up in package manager argv and, for some
//! backends, in a shell line. They also become directory names in the cache.

use crate::error::{Result, YoinkError};
use regex::Regex;
use std::sync::LazyLock;

/// Safe characters for package names across apt, dnf and pacman.
/// Allows: alphanumeric, dash, underscore, dot, plus, at sign, colon (multiarch), slash
static SAFE_PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9@._+:/-]+$").expect("Invalid regex pattern"));

/// Versions may carry an epoch (`1:2.0`) or a tilde (`1.0~rc1`)
static SAFE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._+:~-]+$").expect("Invalid regex pattern"));

/// Characters that could be dangerous in shell contexts
static SHELL_DANGEROUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[;`$(){}|&<>\\'"\s*?\[\]]"#).expect("Invalid regex pattern"));

const MAX_NAME_LEN: usize = 256;

/// Validate a package name is safe to hand to a package manager
pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(YoinkError::InvalidPackageSpec(
            "Package name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_NAME_LEN {
        let head: String = name.chars().take(50).collect();
        return Err(YoinkError::InvalidPackageSpec(format!(
            "Package name too long (max {} chars): {}...",
            MAX_NAME_LEN, head
        )));
    }

    if SHELL_DANGEROUS.is_match(name) {
        return Err(YoinkError::InvalidPackageSpec(format!(
            "Package name contains unsafe characters: {}",
            name
        )));
    }

    if !SAFE_PACKAGE_NAME.is_match(name) {
        return Err(YoinkError::InvalidPackageSpec(format!(
            "Package name contains invalid characters: {}",
            name
        )));
    }

    // Would be read as an option by the package manager
    if name.starts_with('-') {
        return Err(YoinkError::InvalidPackageSpec(format!(
            "Package name cannot start with '-': {}",
            name
        )));
    }

    if name.contains("..") {
        return Err(YoinkError::InvalidPackageSpec(format!(
            "Package name cannot contain path traversal: {}",
            name
        )));
    }

    Ok(())
}

/// Validate a requested version string
pub fn validate_version(version: &str) -> Result<()> {
    if version.len() > MAX_NAME_LEN || !SAFE_VERSION.is_match(version) {
        return Err(YoinkError::InvalidPackageSpec(format!(
            "Version contains invalid characters: {}",
            version
        )));
    }
    Ok(())
}

/// Make a name usable as a single cache directory component.
///
/// `/` and `:` are percent-escaped. `%` is rejected by validation, so distinct
/// inputs always give distinct components.
pub fn cache_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '/' => out.push_str("%2F"),
            ':' => out.push_str("%3A"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_package_names() {
        assert!(validate_package_name("cowsay").is_ok());
        assert!(validate_package_name("python3.12").is_ok());
        assert!(validate_package_name("gcc++").is_ok());
        assert!(validate_package_name("libc6:amd64").is_ok());
        assert!(validate_package_name("a@b").is_ok());
        assert!(validate_package_name("extra/ripgrep").is_ok());
    }

    #[test]
    fn test_shell_injection_blocked() {
        assert!(validate_package_name("foo; rm -rf /").is_err());
        assert!(validate_package_name("foo | cat").is_err());
        assert!(validate_package_name("foo$(cat)").is_err());
        assert!(validate_package_name("foo && echo").is_err());
        assert!(validate_package_name("foo*").is_err());
        assert!(validate_package_name("foo%2F").is_err());
        assert!(validate_package_name("foo=latest").is_err());
    }

    #[test]
    fn test_option_like_and_traversal_blocked() {
        assert!(validate_package_name("--help").is_err());
        assert!(validate_package_name("../../../etc/passwd").is_err());
        assert!(validate_package_name("foo/../bar").is_err());
    }

    #[test]
    fn test_empty_and_long_names() {
        assert!(validate_package_name("").is_err());
        assert!(validate_package_name(&"a".repeat(300)).is_err());
    }

    #[test]
    fn test_versions() {
        assert!(validate_version("3.3.0").is_ok());
        assert!(validate_version("1:2.40-1").is_ok());
        assert!(validate_version("1.0~rc1").is_ok());
        assert!(validate_version("1.0 && reboot").is_err());
        assert!(validate_version("1/2").is_err());
    }

    #[test]
    fn test_cache_component() {
        assert_eq!(cache_component("extra/ripgrep"), "extra%2Fripgrep");
        assert_eq!(cache_component("libc6:amd64"), "libc6%3Aamd64");
        assert_eq!(cache_component("1:2.0"), "1%3A2.0");
        assert_ne!(cache_component("a:b"), cache_component("a_b"));
    }
}
