use anyhow::Error;
use macroquad::{
    file::load_file,
    logging::{info, warn},
    miniquad::date,
};
use serde::Deserialize;
use std::time::Duration;

pub const SETTINGS_PATH: &str = "minigames.json";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_size: [u32; 2],
    /// Fixed seed for reproducible sessions.
    pub seed: Option<u64>,
    pub snake_tick_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_size: [1280, 720],
            seed: None,
            snake_tick_ms: 150,
        }
    }
}

impl Settings {
    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Reads [`SETTINGS_PATH`], falling back to defaults if it is absent or broken.
    pub async fn load() -> Self {
        let bytes = match load_file(SETTINGS_PATH).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("No settings loaded from {}: {}", SETTINGS_PATH, err);
                return Self::default();
            }
        };
        match Self::from_json(&bytes) {
            Ok(settings) => {
                info!("Settings loaded from {}", SETTINGS_PATH);
                settings
            }
            Err(err) => {
                warn!("Malformed {}: {}", SETTINGS_PATH, err);
                Self::default()
            }
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
            .unwrap_or_else(|| (date::now() * 1000.0) as u64)
    }

    pub fn snake_tick(&self) -> Duration {
        Duration::from_millis(self.snake_tick_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_keep_defaults() {
        let settings = Settings::from_json(br#"{ "seed": 42 }"#).unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.seed(), 42);
        assert_eq!(settings.window_size, [1280, 720]);
        assert_eq!(settings.snake_tick(), Duration::from_millis(150));
    }

    #[test]
    fn malformed_settings_are_rejected() {
        assert!(Settings::from_json(b"{ \"snake_tick_ms\": \"fast\" }").is_err());
    }

    #[test]
    fn zero_tick_is_clamped() {
        let settings = Settings {
            snake_tick_ms: 0,
            ..Default::default()
        };
        assert_eq!(settings.snake_tick(), Duration::from_millis(1));
    }
}
