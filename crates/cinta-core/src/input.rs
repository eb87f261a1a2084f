//! Keyboard and pointer input mapping
//!
//! Raw browser input is reduced to two small types before it reaches the
//! shell: a [`KeyInput`] carrying the `KeyboardEvent.code` and whether focus
//! is in an editable element, and a [`PointerSample`] carrying the client X
//! of a mouse or first touch point.

use serde::{Deserialize, Serialize};

/// Keyboard/remote control handling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlAction {
    PlayPause,
    SeekForward,
    SeekBackward,
    LongSeekForward,
    LongSeekBackward,
    FrameForward,
    FrameBackward,
    VolumeUp,
    VolumeDown,
    Mute,
    Fullscreen,
    /// Exit fullscreen and close the settings panel
    Dismiss,
}

impl ControlAction {
    /// Map a `KeyboardEvent.code` to its action
    pub fn from_code(code: &str) -> Option<Self> {
        let action = match code {
            "Space" | "KeyK" => ControlAction::PlayPause,
            "ArrowRight" => ControlAction::SeekForward,
            "ArrowLeft" => ControlAction::SeekBackward,
            "KeyL" => ControlAction::LongSeekForward,
            "KeyJ" => ControlAction::LongSeekBackward,
            "Period" => ControlAction::FrameForward,
            "Comma" => ControlAction::FrameBackward,
            "ArrowUp" => ControlAction::VolumeUp,
            "ArrowDown" => ControlAction::VolumeDown,
            "KeyM" => ControlAction::Mute,
            "KeyF" => ControlAction::Fullscreen,
            "Escape" => ControlAction::Dismiss,
            _ => return None,
        };
        Some(action)
    }
}

/// A key press as seen by the shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    /// Physical key code, e.g. `"KeyK"` or `"ArrowUp"`
    pub code: String,
    /// Focus is in a text input, textarea or content-editable element
    pub typing: bool,
}

impl KeyInput {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            typing: false,
        }
    }

    pub fn typing(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            typing: true,
        }
    }

    /// Resolve the shortcut, honoring typing suppression
    pub fn action(&self) -> Option<ControlAction> {
        if self.typing {
            return None;
        }
        ControlAction::from_code(&self.code)
    }
}

/// Returns true when an element with this tag name receives typed text
pub fn is_typing_target(tag_name: &str, content_editable: bool) -> bool {
    content_editable
        || tag_name.eq_ignore_ascii_case("INPUT")
        || tag_name.eq_ignore_ascii_case("TEXTAREA")
}

/// Pointer origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Unified pointer coordinate.
///
/// Touch events substitute the first touch point's X for the mouse X; a
/// touch-end has no remaining touch points and therefore no coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub kind: PointerKind,
    pub client_x: f64,
}

impl PointerSample {
    pub fn mouse(client_x: f64) -> Self {
        Self {
            kind: PointerKind::Mouse,
            client_x,
        }
    }

    pub fn touch(client_x: f64) -> Self {
        Self {
            kind: PointerKind::Touch,
            client_x,
        }
    }

    /// Build from the X coordinates of the active touch points
    pub fn from_touches(touches: &[f64]) -> Option<Self> {
        touches.first().map(|x| Self::touch(*x))
    }
}

/// Horizontal extent of a track element in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackBounds {
    pub left: f64,
    pub width: f64,
}

impl TrackBounds {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Offset of `client_x` into the track, clamped to `[0, width]`
    pub fn clamp_offset(&self, client_x: f64) -> f64 {
        let width = self.width.max(0.0);
        (client_x - self.left).clamp(0.0, width)
    }
}

/// Detect phones and tablets from a user agent string
pub fn is_touch_user_agent(user_agent: &str) -> bool {
    const MARKERS: [&str; 5] = ["mobi", "android", "iphone", "ipad", "ipod"];
    let ua = user_agent.to_ascii_lowercase();
    MARKERS.iter().any(|marker| ua.contains(marker))
}
