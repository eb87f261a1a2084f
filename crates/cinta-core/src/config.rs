//! Shell configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tunables for the player shell.
///
/// User preferences (volume, rate, frame step) are not configuration; they
/// live in the settings store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Arrow-key seek in seconds
    pub seek_step: f64,
    /// J/L seek in seconds
    pub long_seek_step: f64,
    /// Arrow-key volume step in percent
    pub volume_step: u8,
    /// Controls hide after this much pointer inactivity (ms)
    pub hide_controls_delay_ms: u64,
    /// Big play/pause glyph lifetime (ms)
    pub big_icon_delay_ms: u64,
    /// Taps reveal the controls instead of toggling playback
    pub touch_device: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            seek_step: 5.0,
            long_seek_step: 10.0,
            volume_step: 10,
            hide_controls_delay_ms: 700,
            big_icon_delay_ms: 500,
            touch_device: false,
        }
    }
}

impl ShellConfig {
    /// Config for phones and tablets
    pub fn touch() -> Self {
        Self {
            touch_device: true,
            ..Self::default()
        }
    }

    pub fn hide_controls_delay(&self) -> Duration {
        Duration::from_millis(self.hide_controls_delay_ms)
    }

    pub fn big_icon_delay(&self) -> Duration {
        Duration::from_millis(self.big_icon_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.seek_step.is_finite() && self.seek_step > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "seek_step must be positive, got {}",
                self.seek_step
            )));
        }
        if !(self.long_seek_step.is_finite() && self.long_seek_step > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "long_seek_step must be positive, got {}",
                self.long_seek_step
            )));
        }
        if self.volume_step == 0 || self.volume_step > 100 {
            return Err(Error::InvalidConfig(format!(
                "volume_step must be in 1..=100, got {}",
                self.volume_step
            )));
        }
        Ok(())
    }
}
