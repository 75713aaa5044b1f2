use std::path::Path;
use std::sync::Mutex;

use crate::models::settings::AppSettings;
use crate::services::preferences::Preferences;

/// Managed state holding the loaded preferences.
pub struct SettingsState {
    preferences: Mutex<Preferences>,
}

impl SettingsState {
    pub fn load(data_dir: &Path, prefers_dark: bool) -> crate::error::Result<Self> {
        Ok(Self {
            preferences: Mutex::new(Preferences::load(data_dir, prefers_dark)?),
        })
    }
}

pub fn get_settings(state: &SettingsState) -> Result<AppSettings, String> {
    let prefs = state.preferences.lock().map_err(|e| e.to_string())?;
    Ok(prefs.settings().clone())
}

pub fn set_dark_mode(dark_mode: bool, state: &SettingsState) -> Result<(), String> {
    let mut prefs = state.preferences.lock().map_err(|e| e.to_string())?;
    prefs.set_dark_mode(dark_mode).map_err(|e| e.to_string())
}

pub fn toggle_dark_mode(state: &SettingsState) -> Result<bool, String> {
    let mut prefs = state.preferences.lock().map_err(|e| e.to_string())?;
    prefs.toggle_dark_mode().map_err(|e| e.to_string())
}
