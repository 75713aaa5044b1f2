use std::path::Path;

use crate::models::settings::AppSettings;
use crate::storage::store::JsonStore;

pub const STORE_FILE: &str = "settings.json";
pub const DARK_MODE_KEY: &str = "darkMode";

pub fn open_store(data_dir: &Path) -> crate::error::Result<JsonStore> {
    JsonStore::open(data_dir.join(STORE_FILE))
}

/// Read settings. Missing or malformed keys fall back to defaults.
pub fn get_settings(store: &JsonStore) -> AppSettings {
    let dark_mode = store
        .get(DARK_MODE_KEY)
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    AppSettings { dark_mode }
}

/// Save settings. Persists to disk immediately.
pub fn save_settings(store: &mut JsonStore, settings: &AppSettings) -> crate::error::Result<()> {
    store.set(DARK_MODE_KEY, serde_json::to_value(settings.dark_mode)?);
    store.save()?;
    log::debug!("Saved settings to {}", store.path().display());
    Ok(())
}
