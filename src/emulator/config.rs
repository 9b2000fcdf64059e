// Configuration management
//
// Host-side settings persisted as TOML next to the executable. Missing or
// malformed files fall back to defaults so a fresh checkout runs without
// ceremony.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name
const CONFIG_FILE: &str = "emulator_config.toml";

/// Host configuration: window and audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Window scale factor (1-8)
    pub scale: u32,

    /// Enable VSync
    pub vsync: bool,

    /// Enable audio output
    pub audio_enabled: bool,

    /// Output sample rate in Hz
    pub sample_rate: u32,

    /// Master volume (0.0-1.0)
    pub volume: f32,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            scale: 3,
            vsync: true,
            audio_enabled: true,
            sample_rate: 44_100,
            volume: 1.0,
        }
    }
}

impl EmulatorConfig {
    /// Load from the default config file, falling back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    fn load_from<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!(
                        "ignoring malformed config {}: {}",
                        path.as_ref().display(),
                        err
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist to the default config file
    pub fn save(&self) -> std::io::Result<()> {
        let text = toml::to_string_pretty(self).expect("config serializes");
        fs::write(CONFIG_FILE, text)
    }
}
