//! Startup configuration.
//!
//! Everything is fixed at startup. Values come from environment variables with
//! defaults for anything missing or unparsable; the result is then validated.

use thiserror::Error;

use crate::types::{
    DEFAULT_EXPANSION_RATIO, DEFAULT_GENERATION_MS, DEFAULT_LONG_PRESS_MS, DEFAULT_POLL_MS,
    DEFAULT_REFRESH_MS, FRAME_HEIGHT, FRAME_WIDTH,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeConfig {
    pub rows: u16,
    pub cols: u16,
    /// Expansion ratio `k`: pixels per cell edge, per axis
    pub ratio: u16,
    pub long_press_ms: u64,
    /// Auto-release for sources without key-up edges. Off unless set.
    pub release_timeout_ms: Option<u64>,
    pub generation_ms: u32,
    pub refresh_ms: u64,
    pub poll_ms: u64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self::with_ratio(DEFAULT_EXPANSION_RATIO)
    }
}

impl LifeConfig {
    /// Grid derived from the reference 1280x720 frame at ratio `k`.
    pub fn with_ratio(ratio: u16) -> Self {
        let k = ratio.max(1) as u32;
        Self {
            rows: (FRAME_HEIGHT / k) as u16,
            cols: (FRAME_WIDTH / k) as u16,
            ratio,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            release_timeout_ms: None,
            generation_ms: DEFAULT_GENERATION_MS,
            refresh_ms: DEFAULT_REFRESH_MS,
            poll_ms: DEFAULT_POLL_MS,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LifeConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            lookup(key).and_then(|s| s.trim().parse().ok())
        }

        let ratio = parsed(&lookup, "LIFE_RATIO").unwrap_or(DEFAULT_EXPANSION_RATIO);
        let mut config = Self::with_ratio(ratio);

        if let Some(rows) = parsed(&lookup, "LIFE_ROWS") {
            config.rows = rows;
        }
        if let Some(cols) = parsed(&lookup, "LIFE_COLS") {
            config.cols = cols;
        }
        if let Some(v) = parsed(&lookup, "LIFE_LONG_PRESS_MS") {
            config.long_press_ms = v;
        }
        if let Some(v) = parsed(&lookup, "LIFE_RELEASE_TIMEOUT_MS") {
            config.release_timeout_ms = Some(v);
        }
        if let Some(v) = parsed(&lookup, "LIFE_GENERATION_MS") {
            config.generation_ms = v;
        }
        if let Some(v) = parsed(&lookup, "LIFE_REFRESH_MS") {
            config.refresh_ms = v;
        }
        if let Some(v) = parsed(&lookup, "LIFE_POLL_MS") {
            config.poll_ms = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, u64); 8] = [
            ("ratio", self.ratio as u64),
            ("rows", self.rows as u64),
            ("cols", self.cols as u64),
            ("long_press_ms", self.long_press_ms),
            ("release_timeout_ms", self.release_timeout_ms.unwrap_or(1)),
            ("generation_ms", self.generation_ms as u64),
            ("refresh_ms", self.refresh_ms),
            ("poll_ms", self.poll_ms),
        ];
        if let Some((name, _)) = checks.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Zero(*name));
        }
        Ok(())
    }

    /// Stream width in pixels
    pub fn frame_width(&self) -> u32 {
        self.cols as u32 * self.ratio as u32
    }

    /// Stream height in pixels
    pub fn frame_height(&self) -> u32 {
        self.rows as u32 * self.ratio as u32
    }
}
