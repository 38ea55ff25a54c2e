pub mod archive;
pub mod command;
pub mod paths;
pub mod platform;
pub mod sanitize;
