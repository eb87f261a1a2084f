//! Persisted user preferences
//!
//! Preferences are stored as flat string values under four keys. Loading is
//! lenient: a missing or malformed value falls back to that field's default
//! and never fails the whole load.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

pub const DEFAULT_FRAME_STEP: u32 = 30;
pub const DEFAULT_PLAYBACK_RATE: f64 = 1.0;
pub const DEFAULT_VOLUME: u8 = 100;

/// Keys written to the settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingsKey {
    Frames,
    Velocity,
    Volume,
    Muted,
}

impl SettingsKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsKey::Frames => "frames",
            SettingsKey::Velocity => "velocity",
            SettingsKey::Volume => "volume",
            SettingsKey::Muted => "muted",
        }
    }
}

impl std::fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat string key/value persistence
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// In-memory store.
///
/// Clones share the same map, so a test can keep a handle to a store it has
/// moved into a shell.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Rc::new(RefCell::new(map)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Serialize the current entries as a JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.entries.borrow())?)
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.borrow_mut().clear();
        Ok(())
    }
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Current source; never persisted
    pub source_url: Option<String>,
    /// Declared frames per second, used for single-frame seeks
    pub frame_step: u32,
    pub playback_rate: f64,
    pub muted: bool,
    /// 0-100
    pub volume: u8,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            source_url: None,
            frame_step: DEFAULT_FRAME_STEP,
            playback_rate: DEFAULT_PLAYBACK_RATE,
            muted: false,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl PlaybackSettings {
    /// Load from a store, falling back to defaults field by field
    pub fn load(store: &dyn SettingsStore) -> Self {
        let frame_step = read_or(store, SettingsKey::Frames, parse_frames, DEFAULT_FRAME_STEP);
        let playback_rate =
            read_or(store, SettingsKey::Velocity, parse_rate, DEFAULT_PLAYBACK_RATE);
        let volume = read_or(store, SettingsKey::Volume, parse_volume, DEFAULT_VOLUME);
        let muted = store
            .get(SettingsKey::Muted.as_str())
            .is_some_and(|raw| raw == "true");

        let settings = Self {
            source_url: None,
            frame_step,
            playback_rate,
            muted,
            volume,
        };
        debug!(?settings, "Settings loaded");
        settings
    }

    /// Length of one frame in seconds
    pub fn frame_duration(&self) -> f64 {
        1.0 / f64::from(self.frame_step.max(1))
    }
}

fn read_or<T: Copy + std::fmt::Debug>(
    store: &dyn SettingsStore,
    key: SettingsKey,
    parse: fn(&str) -> Option<T>,
    default: T,
) -> T {
    let Some(raw) = store.get(key.as_str()) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|| {
        warn!(key = %key, raw = %raw, ?default, "Malformed persisted setting, using default");
        default
    })
}

/// Positive integer frame rate
pub fn parse_frames(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|frames| *frames > 0)
}

/// Finite, positive playback rate
pub fn parse_rate(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite() && *rate > 0.0)
}

/// Volume percentage in 0..=100; fractional values are rounded
pub fn parse_volume(raw: &str) -> Option<u8> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|volume| volume.is_finite())
        .map(f64::round)
        .filter(|volume| (0.0..=100.0).contains(volume))
        .map(|volume| volume as u8)
}

/// Raw settings-panel fields, validated on submit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsForm {
    pub source_url: String,
    pub frames: String,
    pub velocity: String,
}

/// Validated form contents
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    pub source_url: Option<String>,
    pub frame_step: u32,
    pub playback_rate: f64,
}

impl SettingsForm {
    /// Form pre-filled from the current settings
    pub fn from_settings(settings: &PlaybackSettings) -> Self {
        Self {
            source_url: settings.source_url.clone().unwrap_or_default(),
            frames: settings.frame_step.to_string(),
            velocity: settings.playback_rate.to_string(),
        }
    }

    /// Put the playable URL of a picked file into the URL field
    pub fn select_file_url(&mut self, url: impl Into<String>) {
        self.source_url = url.into();
    }

    pub fn validate(&self) -> Result<ValidatedForm> {
        let frame_step = parse_frames(&self.frames)
            .ok_or_else(|| Error::invalid_setting("frames", &self.frames))?;
        let playback_rate = parse_rate(&self.velocity)
            .ok_or_else(|| Error::invalid_setting("velocity", &self.velocity))?;
        let url = self.source_url.trim();

        Ok(ValidatedForm {
            source_url: (!url.is_empty()).then(|| url.to_string()),
            frame_step,
            playback_rate,
        })
    }
}
