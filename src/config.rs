//! Persistent settings, stored as TOML through confy.
//!
//! ```toml
//! default_meridiem = "AM"
//! log_level = "debug"
//!
//! [alarm]
//! bell = true
//! sound_file = "/usr/share/sounds/alarm.ogg"
//! volume = 0.8
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use crate::alarm::{Alarm, AlarmSet, SilentAlarm, TerminalBell};
use crate::error::{Error, Result};
use crate::input::Meridiem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// confy application name, also the log directory name.
pub const APP_NAME: &str = "countdown";

/// All settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How expiry is announced.
    pub alarm: AlarmConfig,
    /// Meridiem selected on open. Reset always selects AM.
    pub default_meridiem: Meridiem,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: Option<String>,
}

/// Alarm settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Ring the terminal bell.
    pub bell: bool,
    /// Audio file to play, with the `sound` feature.
    pub sound_file: Option<PathBuf>,
    /// Playback volume, `0.0` to `1.0`.
    pub volume: f32,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            bell: true,
            sound_file: None,
            volume: 1.0,
        }
    }
}

impl AlarmConfig {
    /// The volume clamped to `0.0..=1.0`.
    pub fn volume(&self) -> f32 {
        if self.volume.is_nan() {
            return 1.0;
        }
        self.volume.clamp(0.0, 1.0)
    }

    /// The alarms these settings ask for. Empty when `silent`.
    pub fn alarm_set(&self, silent: bool) -> AlarmSet {
        let mut set = AlarmSet::new();
        if silent {
            return set;
        }
        if self.bell {
            set = set.with(TerminalBell);
        }
        if let Some(path) = &self.sound_file {
            set = self.with_sound(set, path);
        }
        set
    }

    /// Boxed [`alarm_set`](Self::alarm_set), ready for the controller.
    pub fn build(&self, silent: bool) -> Box<dyn Alarm + Send> {
        let set = self.alarm_set(silent);
        if set.is_empty() {
            Box::new(SilentAlarm)
        } else {
            Box::new(set)
        }
    }

    #[cfg(feature = "sound")]
    fn with_sound(&self, set: AlarmSet, path: &Path) -> AlarmSet {
        set.with(crate::alarm::SoundFileAlarm::new(path, self.volume()))
    }

    #[cfg(not(feature = "sound"))]
    fn with_sound(&self, set: AlarmSet, path: &Path) -> AlarmSet {
        tracing::warn!(
            path = %path.display(),
            "sound_file is set but sound support is not compiled in"
        );
        set
    }
}

impl Config {
    /// Loads from the platform config path, creating it with defaults if missing.
    pub fn load() -> Result<Self> {
        Ok(confy::load(APP_NAME, None)?)
    }

    /// Loads from an explicit file, creating it with defaults if missing.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(confy::load_path(path)?)
    }

    /// Loads from `path` when given, otherwise from the platform path.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_path(path),
            None => Self::load(),
        }
    }

    /// Writes to the platform config path.
    pub fn store(&self) -> Result<()> {
        confy::store(APP_NAME, None, self).map_err(Error::ConfigSave)
    }

    /// Writes to an explicit file.
    pub fn store_path(&self, path: impl AsRef<Path>) -> Result<()> {
        confy::store_path(path, self).map_err(Error::ConfigSave)
    }

    /// The platform config file path.
    pub fn path() -> Result<PathBuf> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }
}
