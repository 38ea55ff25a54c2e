pub mod environment;
pub mod fetch;
pub mod locator;
pub mod types;
