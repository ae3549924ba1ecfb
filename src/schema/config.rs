//! Configuration types for playback parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::playback::CACHE_INTERVAL;

fn default_cache_interval() -> usize {
    CACHE_INTERVAL
}

fn default_speed_ms() -> u64 {
    500
}

/// Playback engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Events between snapshot checkpoints. Bounds the replay cost of a seek.
    #[serde(default = "default_cache_interval")]
    pub cache_interval: usize,
    /// Milliseconds per event while playing. Not bounded.
    #[serde(default = "default_speed_ms")]
    pub speed_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            cache_interval: default_cache_interval(),
            speed_ms: default_speed_ms(),
        }
    }
}

impl PlaybackConfig {
    /// Time per event as a [`Duration`].
    #[inline]
    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_interval == 0 {
            return Err(ConfigError::ZeroCacheInterval);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cache interval must be non-zero")]
    ZeroCacheInterval,
}
