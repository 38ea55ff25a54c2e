pub mod runtime;
pub mod settings;

pub use runtime::{Overrides, RuntimeConfig};
pub use settings::Settings;
