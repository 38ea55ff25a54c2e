//! Central project identity contract.
//!
//! This module is the single source of truth for runtime identity values.

pub const BINARY_NAME: &str = "yoink";
pub const PROJECT_QUALIFIER: &str = "io";
pub const PROJECT_ORG: &str = "yoink";
pub const CACHE_DIR_NAME: &str = "yoink";
pub const ENV_PREFIX: &str = "YOINK";
pub const SETTINGS_FILE_BASENAME: &str = "settings.kdl";

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key() {
        assert_eq!(env_key("CACHE_DIR"), "YOINK_CACHE_DIR");
    }
}
