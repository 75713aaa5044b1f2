//! Dark-mode preference, read once at startup and persisted on every change.

use std::path::Path;

use crate::models::settings::AppSettings;
use crate::storage::settings;
use crate::storage::store::JsonStore;

pub struct Preferences {
    settings: AppSettings,
    store: JsonStore,
}

impl Preferences {
    /// Load from `data_dir`. Dark mode starts on when it was stored as on or
    /// when the host reports a dark color-scheme preference.
    pub fn load(data_dir: &Path, prefers_dark: bool) -> crate::error::Result<Self> {
        let store = settings::open_store(data_dir)?;
        let stored = settings::get_settings(&store);
        let settings = AppSettings {
            dark_mode: stored.dark_mode || prefers_dark,
        };
        log::info!(
            "Loaded preferences from {} (dark mode: {})",
            store.path().display(),
            settings.dark_mode
        );
        Ok(Self { settings, store })
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Update in memory and persist synchronously. Memory is left unchanged
    /// if persisting fails.
    pub fn set_dark_mode(&mut self, dark_mode: bool) -> crate::error::Result<()> {
        let next = AppSettings { dark_mode };
        settings::save_settings(&mut self.store, &next)?;
        self.settings = next;
        Ok(())
    }

    /// Flip dark mode and return the new value.
    pub fn toggle_dark_mode(&mut self) -> crate::error::Result<bool> {
        let next = !self.settings.dark_mode;
        self.set_dark_mode(next)?;
        Ok(next)
    }
}
