/// Settings file loading and environment overrides
pub mod settings;

/// Data directory setup and record store opening
pub mod storage;

pub use settings::{Settings, load_default_settings, load_settings};
pub use storage::open_store;
