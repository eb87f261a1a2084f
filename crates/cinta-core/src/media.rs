//! Media element and fullscreen collaborators
//!
//! Decoding, rendering and the playback clock belong to the host's media
//! element. The shell only drives it through [`MediaElement`] and listens to
//! its lifecycle through [`MediaEvent`].

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Host media element (an HTML `<video>` in the browser)
pub trait MediaElement {
    /// Start playback; failures are reported by the element itself
    fn play(&mut self);
    fn pause(&mut self);

    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);

    /// Duration in seconds; NaN or infinite before metadata is known
    fn duration(&self) -> f64;

    /// Volume in 0.0-1.0
    fn set_volume(&mut self, volume: f64);

    fn set_muted(&mut self, muted: bool);

    fn playback_rate(&self) -> f64;
    fn set_playback_rate(&mut self, rate: f64);

    /// Currently assigned source URL
    fn source(&self) -> Option<String>;
    /// Assign a source without reloading
    fn set_source(&mut self, url: Option<&str>);
    /// Reload the element from its current source
    fn load(&mut self);
}

/// Media element lifecycle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaEvent {
    LoadedMetadata,
    TimeUpdate,
    Seeking,
    Seeked,
    Ended,
}

impl MediaEvent {
    pub const ALL: [MediaEvent; 5] = [
        MediaEvent::LoadedMetadata,
        MediaEvent::TimeUpdate,
        MediaEvent::Seeking,
        MediaEvent::Seeked,
        MediaEvent::Ended,
    ];

    /// DOM event name
    pub fn dom_name(&self) -> &'static str {
        match self {
            MediaEvent::LoadedMetadata => "loadedmetadata",
            MediaEvent::TimeUpdate => "timeupdate",
            MediaEvent::Seeking => "seeking",
            MediaEvent::Seeked => "seeked",
            MediaEvent::Ended => "ended",
        }
    }
}

/// Fullscreen platform API
pub trait Fullscreen {
    fn is_fullscreen(&self) -> bool;
    fn request(&mut self);
    fn exit(&mut self);
}

/// Observable state of a [`HeadlessMedia`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlessMediaState {
    pub playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub playback_rate: f64,
    pub source: Option<String>,
    /// Number of `load()` calls
    pub loads: u32,
    /// Number of `play()` calls
    pub plays: u32,
}

impl Default for HeadlessMediaState {
    fn default() -> Self {
        Self {
            playing: false,
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            muted: false,
            playback_rate: 1.0,
            source: None,
            loads: 0,
            plays: 0,
        }
    }
}

/// In-memory media element for native hosts and tests.
///
/// Behaves like a paused browser element: seeks clamp to the known
/// duration and nothing advances on its own. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMedia {
    state: Rc<RefCell<HeadlessMediaState>>,
}

impl HeadlessMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> HeadlessMediaState {
        self.state.borrow().clone()
    }

    /// Simulate metadata arriving for the current source
    pub fn set_duration(&self, duration: f64) {
        self.state.borrow_mut().duration = duration;
    }

    /// Simulate the playback clock moving
    pub fn advance_clock(&self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        let target = state.current_time + seconds;
        state.current_time = clamp_to_duration(target, state.duration);
    }
}

fn clamp_to_duration(seconds: f64, duration: f64) -> f64 {
    let seconds = seconds.max(0.0);
    if duration.is_finite() {
        seconds.min(duration)
    } else {
        seconds
    }
}

impl MediaElement for HeadlessMedia {
    fn play(&mut self) {
        let mut state = self.state.borrow_mut();
        state.playing = true;
        state.plays += 1;
    }

    fn pause(&mut self) {
        self.state.borrow_mut().playing = false;
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        state.current_time = clamp_to_duration(seconds, state.duration);
    }

    fn duration(&self) -> f64 {
        self.state.borrow().duration
    }

    fn set_volume(&mut self, volume: f64) {
        self.state.borrow_mut().volume = volume.clamp(0.0, 1.0);
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.borrow_mut().muted = muted;
    }

    fn playback_rate(&self) -> f64 {
        self.state.borrow().playback_rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.state.borrow_mut().playback_rate = rate;
    }

    fn source(&self) -> Option<String> {
        self.state.borrow().source.clone()
    }

    fn set_source(&mut self, url: Option<&str>) {
        self.state.borrow_mut().source = url.map(str::to_string);
    }

    fn load(&mut self) {
        let mut state = self.state.borrow_mut();
        state.loads += 1;
        state.playing = false;
        state.current_time = 0.0;
        state.duration = f64::NAN;
    }
}

/// In-memory fullscreen flag; clones share state
#[derive(Debug, Clone, Default)]
pub struct HeadlessFullscreen {
    active: Rc<RefCell<bool>>,
}

impl HeadlessFullscreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the user leaving fullscreen through the browser
    pub fn force_exit(&self) {
        *self.active.borrow_mut() = false;
    }
}

impl Fullscreen for HeadlessFullscreen {
    fn is_fullscreen(&self) -> bool {
        *self.active.borrow()
    }

    fn request(&mut self) {
        *self.active.borrow_mut() = true;
    }

    fn exit(&mut self) {
        *self.active.borrow_mut() = false;
    }
}
