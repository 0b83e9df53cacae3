//! Storage setup - prepares the data and image directories and opens the
//! record store the rest of the application works through.

use super::settings::Settings;
use crate::errors::Result;
use crate::store::RecordStore;
use std::fs;
use tracing::info;

/// Opens the record store described by `settings`.
///
/// Both the data directory and the images directory are created when missing,
/// so a fresh checkout works without any setup.
pub fn open_store(settings: &Settings) -> Result<RecordStore> {
    fs::create_dir_all(&settings.images_dir)?;
    let store = RecordStore::open(&settings.data_dir)?;
    info!(
        "Storage ready (data: {:?}, images: {:?})",
        settings.data_dir, settings.images_dir
    );
    Ok(store)
}
