//! Native package manager backends.
//!
//! Each backend knows how to fetch a package archive without installing it
//! and how to unpack that archive into an arbitrary directory.

pub mod apt;
pub mod dnf;
pub mod pacman;
pub mod registry;
pub mod traits;

pub use registry::BackendRegistry;
pub use traits::PackageManager;
