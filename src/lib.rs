//! DropVault upload queue core.
//!
//! Tracks files handed over by a file picker or drop zone, simulates their
//! upload progress on per-entry timers, owns their preview handles and keeps
//! the user's dark-mode preference. A presentation layer drives it through
//! [`commands`].

use std::path::Path;
use std::sync::Arc;

pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

use commands::settings::SettingsState;
use commands::upload::UploadState;
use models::upload::SimulationConfig;
use services::notify::Notifier;

/// Application state handed to the presentation layer.
pub struct DropVault {
    pub upload: UploadState,
    pub settings: SettingsState,
}

impl DropVault {
    /// Load preferences from `data_dir` and build an empty upload queue.
    pub fn start(
        data_dir: &Path,
        prefers_dark: bool,
        config: &SimulationConfig,
        notifier: Arc<dyn Notifier>,
    ) -> error::Result<Self> {
        let settings = SettingsState::load(data_dir, prefers_dark)?;
        let upload = UploadState::new(config, notifier)?;
        log::info!("DropVault started (data dir: {})", data_dir.display());
        Ok(Self { upload, settings })
    }

    /// Cancel all simulations and release every preview.
    pub fn shutdown(&self) {
        self.upload.queue.shutdown();
    }
}
