use std::{path::Path, time::Duration};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use shared::domain::LevelId;

pub const DEFAULT_SETTINGS_FILE: &str = "explorer.toml";
const ENV_PREFIX: &str = "EXPLORER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pause between a satisfied step and the instruction panel moving on.
    pub step_advance_delay_ms: u64,
    pub default_folder_name: String,
    pub default_file_name: String,
    pub copy_suffix: String,
    pub archive_name: String,
    pub notification_capacity: usize,
    pub start_level: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step_advance_delay_ms: 500,
            default_folder_name: "New Folder".into(),
            default_file_name: "New Text Document.txt".into(),
            copy_suffix: " - Copy".into(),
            archive_name: "Archive.zip".into(),
            notification_capacity: 64,
            start_level: 1,
        }
    }
}

impl Settings {
    pub fn step_advance_delay(&self) -> Duration {
        Duration::from_millis(self.step_advance_delay_ms)
    }

    pub fn start_level(&self) -> LevelId {
        LevelId(self.start_level)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Defaults, then the TOML file at `path` if it exists, then `EXPLORER__*`
/// environment variables (e.g. `EXPLORER__STEP_ADVANCE_DELAY_MS=0`).
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
