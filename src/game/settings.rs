use crate::model::Difficulty;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::generator::WORD_PROBLEM_RATIO;

pub const APP_DIR: &str = "math-adventure";
const SETTINGS_VERSION: u32 = 2;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default = "default_true")]
    pub sound_enabled: bool,

    #[serde(default = "default_true")]
    pub music_enabled: bool,

    #[serde(default = "default_true")]
    pub show_visual_help: bool,

    #[serde(default)]
    pub time_limit_enabled: bool,

    #[serde(default = "default_time_limit_seconds")]
    pub time_limit_seconds: u32,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default = "default_word_problem_ratio")]
    pub word_problem_ratio: f64,

    #[serde(default = "default_sync_debounce_ms")]
    pub sync_debounce_ms: u64,
}

// Helper functions for default values
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_time_limit_seconds() -> u32 {
    60
}
fn default_word_problem_ratio() -> f64 {
    WORD_PROBLEM_RATIO
}
fn default_sync_debounce_ms() -> u64 {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: SETTINGS_VERSION,
            sound_enabled: true,
            music_enabled: true,
            show_visual_help: true,
            time_limit_enabled: false,
            time_limit_seconds: default_time_limit_seconds(),
            difficulty: Difficulty::default(),
            word_problem_ratio: WORD_PROBLEM_RATIO,
            sync_debounce_ms: default_sync_debounce_ms(),
        }
    }
}

/// Per-user data directory for this application.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&data_dir())
    }

    pub fn load_from(dir: &Path) -> Self {
        let path = Self::settings_path(dir);
        if let Ok(contents) = fs::read_to_string(&path) {
            if let Ok(mut settings) = serde_json::from_str::<Settings>(&contents) {
                settings.migrate();
                return settings;
            }
        }
        let default = Settings::default();
        if let Err(err) = default.save_to(dir) {
            log::warn!(target: "settings", "Could not write default settings: {}", err);
        }
        default
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&data_dir())
    }

    pub fn save_to(&self, dir: &Path) -> Result<(), std::io::Error> {
        let path = Self::settings_path(dir);
        // Ensure the directory exists
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
    }

    fn settings_path(dir: &Path) -> PathBuf {
        dir.join("settings.json")
    }

    fn migrate(&mut self) {
        match self.version {
            // version 1 predates the word-problem ratio and debounce fields; serde
            // defaults have already filled them in
            0 | 1 => {
                self.version = SETTINGS_VERSION;
            }
            _ => (),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_enabled
            .then(|| Duration::from_secs(self.time_limit_seconds as u64))
    }

    pub fn sync_debounce(&self) -> Duration {
        Duration::from_millis(self.sync_debounce_ms)
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    /// `SEED` from the environment; ignored when it is not a number.
    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }
}
