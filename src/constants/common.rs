// Common constants used throughout the codebase

/// Completion marker written into a prefix once extraction succeeded
pub const MARKER_FILE_NAME: &str = ".yoinked";

/// Directory under the cache root holding per-attempt staging directories
pub const DOWNLOADS_DIR_NAME: &str = "downloads";

/// Name prefix of staging directories
pub const STAGING_DIR_PREFIX: &str = "yoink_dl";

/// Cache subdir suffix for unpinned requests.
/// Pinned requests use `@<version>` instead. Neither names nor versions may
/// contain `=`, so the two never collide.
pub const LATEST_TAG: &str = "=latest";
