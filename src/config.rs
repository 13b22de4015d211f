//! Runtime configuration.
//!
//! Everything has a default; a partial JSON object overrides only the fields
//! it names. Bad JSON falls back to the defaults with a warning.

use serde::Deserialize;

/// Storage key the browser entry point reads the config from.
pub const CONFIG_KEY: &str = "clickerConfig";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClickerConfig {
    /// Largest wall-clock gap (ms) converted into ticks in a single frame.
    pub max_frame_ms: f64,
    /// Width of the area bonuses are scattered over.
    pub viewport_width: f64,
    /// Height of the area bonuses are scattered over.
    pub viewport_height: f64,
    /// Fixed RNG seed. `None` seeds from the clock.
    pub seed: Option<u64>,
    /// `log` level filter name (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
}

impl Default for ClickerConfig {
    fn default() -> Self {
        Self {
            max_frame_ms: 500.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            seed: None,
            log_level: "info".into(),
        }
    }
}

impl ClickerConfig {
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring malformed clicker config: {e}");
                Self::default()
            }
        }
    }

    /// Parsed log level, `Info` when the name is not recognised.
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
