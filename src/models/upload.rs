//! Upload simulation configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default period between simulated progress ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 600;
/// Smallest progress increment per tick, in percent.
pub const DEFAULT_MIN_INCREMENT: u8 = 5;
/// Largest progress increment per tick, in percent.
pub const DEFAULT_MAX_INCREMENT: u8 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    pub min_increment: u8,
    pub max_increment: u8,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            min_increment: DEFAULT_MIN_INCREMENT,
            max_increment: DEFAULT_MAX_INCREMENT,
        }
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(AppError::Internal("tick interval must be positive".into()));
        }
        if self.min_increment == 0 {
            return Err(AppError::Internal("minimum increment must be positive".into()));
        }
        if self.min_increment > self.max_increment {
            return Err(AppError::Internal(format!(
                "minimum increment {} exceeds maximum {}",
                self.min_increment, self.max_increment
            )));
        }
        Ok(())
    }
}
