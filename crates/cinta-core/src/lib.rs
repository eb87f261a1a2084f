//! Cinta Core - Frame-accurate video player shell
//!
//! This crate provides the platform-free logic behind the Cinta player:
//! - Transport control with frame-by-frame stepping
//! - Keyboard shortcuts and pointer-driven scrubbers
//! - Controls auto-hide and play/pause feedback timers
//! - Persisted preferences (frame rate, playback rate, volume, mute)
//! - Fullscreen and settings-panel coordination
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Cinta Core                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐       │
//! │  │    Input     │  │  Scrubbers   │  │   Settings   │       │
//! │  │   Mapping    │  │ (time, vol)  │  │    Store     │       │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘       │
//! │         └─────────────────┼─────────────────┘               │
//! │                    ┌──────┴──────┐                          │
//! │                    │   Player    │──── Scheduler            │
//! │                    │    Shell    │                          │
//! │                    └──────┬──────┘                          │
//! │                           │                                 │
//! │            MediaElement ──┴── Fullscreen                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Host bindings implement [`MediaElement`], [`Fullscreen`], [`SettingsStore`]
//! and [`Scheduler`]; headless versions of each ship with the crate.

pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod media;
pub mod scheduler;
pub mod scrubber;
pub mod settings;
pub mod shell;

pub use config::ShellConfig;
pub use error::{Error, Result};
pub use format::{format_time, format_volume};
pub use input::{ControlAction, KeyInput, PointerKind, PointerSample, TrackBounds};
pub use media::{Fullscreen, HeadlessFullscreen, HeadlessMedia, MediaElement, MediaEvent};
pub use scheduler::{ManualScheduler, Scheduler, TimerKind};
#[cfg(feature = "tokio")]
pub use scheduler::{TimerReceiver, TokioScheduler};
pub use scrubber::{Scrubber, ScrubberKind, Tooltip};
pub use settings::{MemoryStore, PlaybackSettings, SettingsForm, SettingsKey, SettingsStore};
pub use shell::{
    BigIcon, PlayerPhase, PlayerShell, PlayerView, ScrubInput, Slider, SubmitOutcome,
    TransportState,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the player library
pub fn init() {
    tracing::info!(version = VERSION, "Cinta Core initialized");
}
