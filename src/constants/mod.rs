pub mod common;
pub mod search_dirs;

pub use common::{DOWNLOADS_DIR_NAME, LATEST_TAG, MARKER_FILE_NAME, STAGING_DIR_PREFIX};
pub use search_dirs::{BIN_DIRS, LIB_DIRS};
