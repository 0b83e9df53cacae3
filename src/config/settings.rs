//! Application settings loaded from `storefront.toml`.
//!
//! Every key is optional; a missing file means all defaults. The data
//! directory can additionally be overridden through `STOREFRONT_DATA_DIR`,
//! which is usually set in `.env`. Images follow the data directory unless
//! `images_dir` points somewhere else.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the settings file
pub const DEFAULT_SETTINGS_PATH: &str = "storefront.toml";

/// Settings for one storefront instance
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the collection files
    pub data_dir: PathBuf,
    /// Directory imported item images are copied into
    pub images_dir: PathBuf,
    /// Shared secret a company must present to register
    pub company_key: String,
    /// Flat amount added to orders shipped with home delivery
    pub delivery_surcharge: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            images_dir: PathBuf::from("data/images"),
            company_key: "123".to_string(),
            delivery_surcharge: Decimal::from(200),
        }
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value has the wrong type or the surcharge is negative
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read settings file: {e}"),
    })?;

    parse_settings(&contents)
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns `Config` for invalid TOML or a negative surcharge.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse storefront.toml: {e}"),
    })?;

    if settings.delivery_surcharge.is_sign_negative() {
        return Err(Error::Config {
            message: "delivery_surcharge cannot be negative".to_string(),
        });
    }

    Ok(settings)
}

/// Loads settings from the default location, falling back to defaults when the
/// file does not exist, then applies environment overrides.
///
/// # Errors
/// Returns `Config` if an existing settings file cannot be read or parsed.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("STOREFRONT_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH), PathBuf::from);

    let settings = if path.exists() {
        debug!("Loading settings from {:?}", path);
        load_settings(&path)?
    } else {
        debug!("No settings file at {:?}, using defaults", path);
        Settings::default()
    };

    Ok(apply_env_overrides(settings))
}

/// Replaces the data directory with `STOREFRONT_DATA_DIR` when it is set.
#[must_use]
pub fn apply_env_overrides(settings: Settings) -> Settings {
    match std::env::var("STOREFRONT_DATA_DIR") {
        Ok(dir) => with_data_dir(settings, PathBuf::from(dir)),
        Err(_) => settings,
    }
}

/// Moves the data directory to `data_dir`.
///
/// An `images_dir` sitting at `<data_dir>/images` moves along with it; any
/// other images directory was chosen explicitly and is kept.
#[must_use]
pub fn with_data_dir(mut settings: Settings, data_dir: PathBuf) -> Settings {
    if settings.images_dir == settings.data_dir.join("images") {
        settings.images_dir = data_dir.join("images");
    }
    debug!("Data directory overridden to {:?}", data_dir);
    settings.data_dir = data_dir;
    settings
}
