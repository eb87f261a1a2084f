//! Scrubber - pointer-driven range control for the timeline and volume slider
//!
//! The scrubber converts a pointer X coordinate into a value in `[min, max]`
//! relative to the track's bounding box. Drags are live-commit: pointer-down
//! and every pointer-move while dragging return the new value for the owner
//! to apply immediately, and pointer-up returns the last preview value once
//! more so the final position always lands.
//!
//! Hovering only moves the preview tooltip and never commits.
//!
//! The scrubber has no notion of event targets. While [`Scrubber::is_dragging`]
//! is true the host must route document-wide move/up events here, otherwise a
//! drag that leaves the track would stop responding.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::format::{format_time, format_volume};
use crate::input::{PointerSample, TrackBounds};

/// What the scrubber controls, which decides the tooltip format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrubberKind {
    /// Playback position in seconds
    Time,
    /// Volume percentage
    Volume,
}

/// Ephemeral pointer state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrubberState {
    pub hovering: bool,
    pub dragging: bool,
    /// Value under the pointer
    pub preview_value: f64,
    /// Pointer offset into the track, clamped to the track width
    pub preview_position_px: f64,
}

/// Hover/drag preview label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub text: String,
    /// Horizontal anchor as a percentage of the track width
    pub left_percent: f64,
}

/// Draggable range control
#[derive(Debug, Clone)]
pub struct Scrubber {
    kind: ScrubberKind,
    min: f64,
    max: f64,
    /// Width of the track at the last pointer sample
    track_width: f64,
    state: ScrubberState,
}

impl Scrubber {
    /// Create a scrubber over `[min, max]`
    pub fn new(kind: ScrubberKind, min: f64, max: f64) -> Self {
        Self {
            kind,
            min,
            max,
            track_width: 0.0,
            state: ScrubberState::default(),
        }
    }

    /// Timeline scrubber; the range grows once metadata reports a duration
    pub fn timeline() -> Self {
        Self::new(ScrubberKind::Time, 0.0, 0.0)
    }

    /// Volume slider over 0-100
    pub fn volume() -> Self {
        Self::new(ScrubberKind::Volume, 0.0, 100.0)
    }

    pub fn kind(&self) -> ScrubberKind {
        self.kind
    }

    pub fn state(&self) -> ScrubberState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    pub fn set_max(&mut self, max: f64) {
        self.max = if max.is_finite() { max } else { 0.0 };
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Map a pointer X to `(offset_px, value)`
    pub fn value_at(&self, client_x: f64, bounds: TrackBounds) -> (f64, f64) {
        let offset = bounds.clamp_offset(client_x);
        if bounds.width <= 0.0 {
            return (0.0, self.min);
        }
        let ratio = offset / bounds.width;
        (offset, self.min + ratio * (self.max - self.min))
    }

    /// Filled portion of the track for `value`, in percent.
    ///
    /// An empty range (such as a zero duration before metadata arrives) is 0%.
    pub fn fill_percent(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if !(range > 0.0) || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / range * 100.0).clamp(0.0, 100.0)
    }

    pub fn pointer_enter(&mut self) {
        self.state.hovering = true;
    }

    /// Leaving the track ends the hover but not an in-flight drag
    pub fn pointer_leave(&mut self) {
        self.state.hovering = false;
    }

    /// Begin a drag and commit the value under the pointer
    pub fn pointer_down(&mut self, sample: PointerSample, bounds: TrackBounds) -> f64 {
        self.state.dragging = true;
        let value = self.update_preview(sample, bounds);
        debug!(kind = ?self.kind, value, "Scrub started");
        value
    }

    /// Update the preview; returns the value to commit while dragging
    pub fn pointer_move(&mut self, sample: PointerSample, bounds: TrackBounds) -> Option<f64> {
        let value = self.update_preview(sample, bounds);
        self.state.dragging.then_some(value)
    }

    /// End a drag; returns the last preview value for a final commit
    pub fn pointer_up(&mut self) -> Option<f64> {
        if !self.state.dragging {
            return None;
        }
        self.state.dragging = false;
        debug!(kind = ?self.kind, value = self.state.preview_value, "Scrub released");
        Some(self.state.preview_value)
    }

    /// Preview label, shown while hovering or dragging
    pub fn tooltip(&self) -> Option<Tooltip> {
        if !self.state.hovering && !self.state.dragging {
            return None;
        }
        let text = match self.kind {
            ScrubberKind::Time => format_time(self.state.preview_value),
            ScrubberKind::Volume => format_volume(self.state.preview_value),
        };
        let width = if self.track_width > 0.0 { self.track_width } else { 1.0 };
        Some(Tooltip {
            text,
            left_percent: self.state.preview_position_px / width * 100.0,
        })
    }

    fn update_preview(&mut self, sample: PointerSample, bounds: TrackBounds) -> f64 {
        let (offset, value) = self.value_at(sample.client_x, bounds);
        self.track_width = bounds.width;
        self.state.preview_position_px = offset;
        self.state.preview_value = value;
        value
    }
}
