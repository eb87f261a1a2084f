//! Player Shell - interaction coordinator
//!
//! Coordinates:
//! - Transport (play/pause, seeks, frame steps) against the media element
//! - Volume and mute, persisted to the settings store
//! - Timeline and volume scrubbers
//! - Controls auto-hide and the big play/pause glyph
//! - Fullscreen and the settings panel
//!
//! Every input arrives as a discrete call on the UI thread. Without a media
//! element attached, transport operations are silent no-ops.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::ShellConfig,
    format::{format_time, format_volume},
    input::{ControlAction, KeyInput, PointerSample, TrackBounds},
    media::{Fullscreen, MediaElement, MediaEvent},
    scheduler::{Scheduler, TimerKind},
    scrubber::{Scrubber, Tooltip},
    settings::{PlaybackSettings, SettingsForm, SettingsKey, SettingsStore},
    Result,
};

/// Coarse player state, derived from the shell's flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPhase {
    IdleNoSource,
    LoadedPaused,
    LoadedPlaying,
    Seeking,
    Fullscreen,
    SettingsOpen,
}

impl std::fmt::Display for PlayerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerPhase::IdleNoSource => write!(f, "idle"),
            PlayerPhase::LoadedPaused => write!(f, "paused"),
            PlayerPhase::LoadedPlaying => write!(f, "playing"),
            PlayerPhase::Seeking => write!(f, "seeking"),
            PlayerPhase::Fullscreen => write!(f, "fullscreen"),
            PlayerPhase::SettingsOpen => write!(f, "settings"),
        }
    }
}

/// Transient full-size glyph shown on play/pause transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BigIcon {
    Play,
    Pause,
}

/// Playback state mirrored from the media element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportState {
    pub is_playing: bool,
    pub is_muted: bool,
    pub current_time: f64,
    pub duration: f64,
    /// 0-100; independent of `is_muted`
    pub volume: u8,
}

/// The shell's two scrubbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slider {
    Timeline,
    Volume,
}

/// Pointer input routed to a scrubber
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrubInput {
    Enter,
    Leave,
    Down(PointerSample, TrackBounds),
    Move(PointerSample, TrackBounds),
    Up,
}

/// What a settings submit changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub reloaded: bool,
    pub rate_changed: bool,
}

/// Everything the UI renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub phase: PlayerPhase,
    pub is_playing: bool,
    pub is_muted: bool,
    pub volume: u8,
    pub volume_label: String,
    pub current_time: f64,
    pub duration: f64,
    pub current_time_label: String,
    pub duration_label: String,
    /// Timeline fill in percent
    pub timeline_fill: f64,
    /// Volume fill in percent; 0 while muted
    pub volume_fill: f64,
    pub volume_icon_muted: bool,
    pub controls_visible: bool,
    pub big_icon: Option<BigIcon>,
    pub seeking: bool,
    pub show_no_source_overlay: bool,
    pub settings_open: bool,
    pub fullscreen: bool,
    pub timeline_tooltip: Option<Tooltip>,
    pub volume_tooltip: Option<Tooltip>,
    pub frame_step: u32,
    pub playback_rate: f64,
    pub source_url: Option<String>,
}

impl PlayerView {
    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Player shell owning playback, volume and fullscreen state
pub struct PlayerShell {
    config: ShellConfig,
    settings: PlaybackSettings,
    transport: TransportState,
    media: Option<Box<dyn MediaElement>>,
    fullscreen: Box<dyn Fullscreen>,
    store: Box<dyn SettingsStore>,
    scheduler: Box<dyn Scheduler>,
    timeline: Scrubber,
    volume_slider: Scrubber,
    controls_visible: bool,
    big_icon: Option<BigIcon>,
    /// Element reported seek-start without seek-end
    seeking: bool,
    settings_open: bool,
    /// Fullscreen was active when the settings panel opened
    was_fullscreen: bool,
}

impl PlayerShell {
    /// Create a shell, loading persisted preferences from `store`
    pub fn new(
        config: ShellConfig,
        store: impl SettingsStore + 'static,
        scheduler: impl Scheduler + 'static,
        fullscreen: impl Fullscreen + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let settings = PlaybackSettings::load(&store);
        let transport = TransportState {
            is_playing: false,
            is_muted: settings.muted,
            current_time: 0.0,
            duration: 0.0,
            volume: settings.volume,
        };

        info!(touch = config.touch_device, "Player shell created");

        Ok(Self {
            config,
            settings,
            transport,
            media: None,
            fullscreen: Box::new(fullscreen),
            store: Box::new(store),
            scheduler: Box::new(scheduler),
            timeline: Scrubber::timeline(),
            volume_slider: Scrubber::volume(),
            controls_visible: false,
            big_icon: None,
            seeking: false,
            settings_open: false,
            was_fullscreen: false,
        })
    }

    /// Attach the media element and push preferences onto it
    pub fn attach_media(&mut self, media: impl MediaElement + 'static) {
        let mut media: Box<dyn MediaElement> = Box::new(media);
        media.set_volume(f64::from(self.transport.volume) / 100.0);
        media.set_muted(self.transport.is_muted);
        media.set_playback_rate(self.settings.playback_rate);
        if let Some(url) = self.settings.source_url.as_deref() {
            if media.source().as_deref() != Some(url) {
                media.set_source(Some(url));
                media.load();
            }
        }
        self.media = Some(media);
        debug!("Media element attached");
    }

    /// Detach the media element; transport becomes a no-op
    pub fn detach_media(&mut self) -> Option<Box<dyn MediaElement>> {
        self.transport.is_playing = false;
        self.media.take()
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    pub fn transport(&self) -> &TransportState {
        &self.transport
    }

    pub fn has_source(&self) -> bool {
        self.settings.source_url.is_some()
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    pub fn big_icon(&self) -> Option<BigIcon> {
        self.big_icon
    }

    pub fn is_settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn scrubber(&self, slider: Slider) -> &Scrubber {
        match slider {
            Slider::Timeline => &self.timeline,
            Slider::Volume => &self.volume_slider,
        }
    }

    /// A drag is in flight; document-level pointer input must reach this slider
    pub fn is_dragging(&self, slider: Slider) -> bool {
        self.scrubber(slider).is_dragging()
    }

    /// Current phase
    pub fn phase(&self) -> PlayerPhase {
        if self.settings_open {
            PlayerPhase::SettingsOpen
        } else if !self.has_source() {
            PlayerPhase::IdleNoSource
        } else if self.seeking {
            PlayerPhase::Seeking
        } else if self.fullscreen.is_fullscreen() {
            PlayerPhase::Fullscreen
        } else if self.transport.is_playing {
            PlayerPhase::LoadedPlaying
        } else {
            PlayerPhase::LoadedPaused
        }
    }

    // ---------------------------------------------------------------------
    // Source
    // ---------------------------------------------------------------------

    /// Load a source URL; an empty URL clears the source.
    ///
    /// Returns true when the media element was reloaded, which only happens
    /// if the URL differs from the element's current source.
    #[instrument(skip(self))]
    pub fn load_source(&mut self, url: &str) -> bool {
        let url = url.trim();
        self.apply_source((!url.is_empty()).then(|| url.to_string()))
    }

    fn apply_source(&mut self, source: Option<String>) -> bool {
        self.settings.source_url = source.clone();

        let reloaded = match self.media.as_deref_mut() {
            Some(media) if media.source() != source => {
                media.set_source(source.as_deref());
                media.load();
                true
            }
            _ => false,
        };

        if reloaded {
            self.transport.current_time = 0.0;
            self.transport.duration = 0.0;
            self.timeline.set_max(0.0);
            self.seeking = false;
            self.set_playing(false);
            info!(source = ?source, "Source loaded");
        }

        if source.is_none() {
            self.scheduler.cancel(TimerKind::HideControls);
            self.controls_visible = false;
        }

        reloaded
    }

    // ---------------------------------------------------------------------
    // Transport
    // ---------------------------------------------------------------------

    /// Toggle between playing and paused
    pub fn toggle_play(&mut self) {
        if !self.has_source() {
            return;
        }
        let Some(media) = self.media.as_deref_mut() else {
            return;
        };

        let playing = !self.transport.is_playing;
        if playing {
            media.play();
        } else {
            media.pause();
        }
        self.set_playing(playing);
        info!(playing, "Playback toggled");
    }

    /// Pause, then move the playhead by `delta` seconds
    pub fn seek_by(&mut self, delta: f64) {
        if !self.has_source() || !delta.is_finite() {
            return;
        }
        let Some(media) = self.media.as_deref_mut() else {
            return;
        };

        media.pause();
        let target = clamp_time(media.current_time() + delta, self.transport.duration);
        media.set_current_time(target);
        self.transport.current_time = target;
        self.set_playing(false);
        debug!(delta, target, "Seek by delta");
    }

    /// Step one declared frame forward or backward
    pub fn step_frame(&mut self, forward: bool) {
        let frame = self.settings.frame_duration();
        self.seek_by(if forward { frame } else { -frame });
    }

    /// Jump to an absolute time without pausing
    pub fn seek_to(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let Some(media) = self.media.as_deref_mut() else {
            return;
        };
        let target = clamp_time(seconds, self.transport.duration);
        media.set_current_time(target);
        self.transport.current_time = target;
    }

    fn set_playing(&mut self, playing: bool) {
        if self.transport.is_playing == playing {
            return;
        }
        self.transport.is_playing = playing;
        self.big_icon = Some(if playing { BigIcon::Play } else { BigIcon::Pause });
        self.scheduler
            .schedule(TimerKind::ClearBigIcon, self.config.big_icon_delay());
    }

    // ---------------------------------------------------------------------
    // Volume
    // ---------------------------------------------------------------------

    pub fn toggle_mute(&mut self) {
        if self.media.is_none() {
            return;
        }
        let muted = !self.transport.is_muted;
        self.set_muted(muted);
    }

    /// Raise volume one step, un-muting first
    pub fn volume_up(&mut self) {
        if self.media.is_none() {
            return;
        }
        if self.transport.is_muted {
            self.set_muted(false);
        }
        self.reveal_controls();

        if self.transport.volume >= 100 {
            return;
        }
        let volume = self.transport.volume.saturating_add(self.config.volume_step).min(100);
        self.apply_volume(volume);
    }

    /// Lower volume one step; reaching or pressing below zero mutes
    pub fn volume_down(&mut self) {
        if self.media.is_none() {
            return;
        }
        self.reveal_controls();

        if self.transport.volume == 0 {
            self.set_muted(true);
            return;
        }
        let volume = self.transport.volume.saturating_sub(self.config.volume_step);
        self.apply_volume(volume);
        if volume == 0 {
            self.set_muted(true);
        }
    }

    /// Apply a value committed by the volume slider
    pub fn commit_volume(&mut self, value: f64) {
        if self.media.is_none() || !value.is_finite() {
            return;
        }
        if self.transport.is_muted && value >= 1.0 {
            self.set_muted(false);
        }
        self.apply_volume(value.round().clamp(0.0, 100.0) as u8);
    }

    fn set_muted(&mut self, muted: bool) {
        if let Some(media) = self.media.as_deref_mut() {
            media.set_muted(muted);
        }
        self.transport.is_muted = muted;
        self.settings.muted = muted;
        self.persist(SettingsKey::Muted, &muted.to_string());
        debug!(muted, "Mute changed");
    }

    fn apply_volume(&mut self, volume: u8) {
        if let Some(media) = self.media.as_deref_mut() {
            media.set_volume(f64::from(volume) / 100.0);
        }
        self.transport.volume = volume;
        self.settings.volume = volume;
        self.persist(SettingsKey::Volume, &volume.to_string());
    }

    // ---------------------------------------------------------------------
    // Scrubbers
    // ---------------------------------------------------------------------

    /// Route pointer input to a scrubber and apply any committed value
    pub fn scrub(&mut self, slider: Slider, input: ScrubInput) -> Option<f64> {
        let scrubber = match slider {
            Slider::Timeline => &mut self.timeline,
            Slider::Volume => &mut self.volume_slider,
        };

        let commit = match input {
            ScrubInput::Enter => {
                scrubber.pointer_enter();
                None
            }
            ScrubInput::Leave => {
                scrubber.pointer_leave();
                None
            }
            ScrubInput::Down(sample, bounds) => Some(scrubber.pointer_down(sample, bounds)),
            ScrubInput::Move(sample, bounds) => scrubber.pointer_move(sample, bounds),
            ScrubInput::Up => scrubber.pointer_up(),
        };

        if let Some(value) = commit {
            match slider {
                Slider::Timeline => self.seek_to(value),
                Slider::Volume => self.commit_volume(value),
            }
        }
        commit
    }

    // ---------------------------------------------------------------------
    // Media element events
    // ---------------------------------------------------------------------

    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::LoadedMetadata => {
                let Some(media) = self.media.as_deref() else {
                    return;
                };
                let duration = media.duration();
                let duration = if duration.is_finite() && duration > 0.0 {
                    duration
                } else {
                    0.0
                };
                self.transport.duration = duration;
                if !self.timeline.is_dragging() {
                    self.transport.current_time = media.current_time();
                }
                self.timeline.set_max(duration);
                info!(duration, "Metadata loaded");
            }
            MediaEvent::TimeUpdate => {
                // The drag owns the playhead until release
                if self.timeline.is_dragging() {
                    return;
                }
                if let Some(media) = self.media.as_deref() {
                    self.transport.current_time = media.current_time();
                }
            }
            MediaEvent::Seeking => self.seeking = true,
            MediaEvent::Seeked => self.seeking = false,
            MediaEvent::Ended => self.set_playing(false),
        }
    }

    // ---------------------------------------------------------------------
    // Keyboard
    // ---------------------------------------------------------------------

    /// Handle a key press; returns true if it mapped to a shortcut
    pub fn handle_key(&mut self, key: &KeyInput) -> bool {
        let Some(action) = key.action() else {
            return false;
        };
        self.perform(action);
        true
    }

    pub fn perform(&mut self, action: ControlAction) {
        debug!(?action, "Control action");
        match action {
            ControlAction::PlayPause => self.toggle_play(),
            ControlAction::SeekForward => self.seek_by(self.config.seek_step),
            ControlAction::SeekBackward => self.seek_by(-self.config.seek_step),
            ControlAction::LongSeekForward => self.seek_by(self.config.long_seek_step),
            ControlAction::LongSeekBackward => self.seek_by(-self.config.long_seek_step),
            ControlAction::FrameForward => self.step_frame(true),
            ControlAction::FrameBackward => self.step_frame(false),
            ControlAction::VolumeUp => self.volume_up(),
            ControlAction::VolumeDown => self.volume_down(),
            ControlAction::Mute => self.toggle_mute(),
            ControlAction::Fullscreen => self.toggle_fullscreen(),
            ControlAction::Dismiss => {
                self.exit_fullscreen();
                self.close_settings();
            }
        }
    }

    // ---------------------------------------------------------------------
    // Controls visibility
    // ---------------------------------------------------------------------

    /// Pointer or touch movement over the player
    pub fn pointer_activity(&mut self) {
        if !self.has_source() {
            self.scheduler.cancel(TimerKind::HideControls);
            return;
        }
        self.reveal_controls();
    }

    pub fn pointer_enter(&mut self) {
        self.show_controls();
    }

    pub fn pointer_leave(&mut self) {
        if self.has_source() {
            self.schedule_hide();
        }
    }

    /// Click or tap on the video surface.
    ///
    /// A mouse click toggles playback. On touch devices a tap only toggles
    /// the controls overlay.
    pub fn click_video(&mut self) {
        if !self.has_source() {
            return;
        }
        if self.config.touch_device {
            if self.controls_visible {
                self.scheduler.cancel(TimerKind::HideControls);
                self.controls_visible = false;
            } else {
                self.reveal_controls();
            }
            return;
        }
        self.reveal_controls();
        self.toggle_play();
    }

    fn show_controls(&mut self) {
        if !self.has_source() {
            return;
        }
        self.scheduler.cancel(TimerKind::HideControls);
        self.controls_visible = true;
    }

    fn schedule_hide(&mut self) {
        self.scheduler
            .schedule(TimerKind::HideControls, self.config.hide_controls_delay());
    }

    /// Show the controls and restart the auto-hide countdown
    fn reveal_controls(&mut self) {
        self.show_controls();
        if self.controls_visible {
            self.schedule_hide();
        }
    }

    /// Deliver an expired timer
    pub fn handle_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::HideControls => {
                if self.timeline.is_dragging() || self.volume_slider.is_dragging() {
                    self.schedule_hide();
                    return;
                }
                self.controls_visible = false;
            }
            TimerKind::ClearBigIcon => self.big_icon = None,
        }
    }

    // ---------------------------------------------------------------------
    // Fullscreen and settings panel
    // ---------------------------------------------------------------------

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_fullscreen()
    }

    pub fn toggle_fullscreen(&mut self) {
        if self.fullscreen.is_fullscreen() {
            self.exit_fullscreen();
        } else {
            self.fullscreen.request();
            info!("Fullscreen requested");
        }
    }

    /// Leave fullscreen and forget any state to restore
    pub fn exit_fullscreen(&mut self) {
        if self.fullscreen.is_fullscreen() {
            self.fullscreen.exit();
            info!("Fullscreen exited");
        }
        self.was_fullscreen = false;
    }

    /// Open the settings panel, pausing playback
    pub fn open_settings(&mut self) {
        if self.transport.is_playing {
            if let Some(media) = self.media.as_deref_mut() {
                media.pause();
            }
            self.set_playing(false);
        }
        self.was_fullscreen = self.fullscreen.is_fullscreen();
        self.settings_open = true;
        debug!(was_fullscreen = self.was_fullscreen, "Settings opened");
    }

    /// Close the panel, restoring fullscreen if it was active on open
    pub fn close_settings(&mut self) {
        if !self.settings_open {
            return;
        }
        self.settings_open = false;
        if self.was_fullscreen && !self.fullscreen.is_fullscreen() {
            self.fullscreen.request();
            info!("Fullscreen restored");
        }
        self.was_fullscreen = false;
    }

    /// Form contents reflecting the current settings
    pub fn settings_form(&self) -> SettingsForm {
        SettingsForm::from_settings(&self.settings)
    }

    /// Apply the settings panel.
    ///
    /// The playback rate is only written when it changed and the element is
    /// only reloaded when the URL changed. Malformed input changes nothing.
    #[instrument(skip(self))]
    pub fn submit_settings(&mut self, form: &SettingsForm) -> Result<SubmitOutcome> {
        let valid = form.validate()?;

        let mut outcome = SubmitOutcome::default();
        if let Some(media) = self.media.as_deref_mut() {
            if media.playback_rate() != valid.playback_rate {
                media.set_playback_rate(valid.playback_rate);
                outcome.rate_changed = true;
            }
        }
        outcome.reloaded = self.apply_source(valid.source_url);

        self.settings.frame_step = valid.frame_step;
        self.settings.playback_rate = valid.playback_rate;
        self.persist(SettingsKey::Frames, &valid.frame_step.to_string());
        self.persist(SettingsKey::Velocity, &valid.playback_rate.to_string());

        self.close_settings();
        info!(
            frames = valid.frame_step,
            rate = valid.playback_rate,
            reloaded = outcome.reloaded,
            "Settings applied"
        );
        Ok(outcome)
    }

    /// Wipe persisted preferences and return to defaults
    pub fn clear_settings(&mut self) -> Result<()> {
        self.store.clear()?;

        let source_url = self.settings.source_url.take();
        self.settings = PlaybackSettings {
            source_url,
            ..PlaybackSettings::default()
        };
        self.transport.volume = self.settings.volume;
        self.transport.is_muted = self.settings.muted;

        if let Some(media) = self.media.as_deref_mut() {
            media.set_volume(f64::from(self.settings.volume) / 100.0);
            media.set_muted(self.settings.muted);
            media.set_playback_rate(self.settings.playback_rate);
        }
        info!("Settings cleared");
        Ok(())
    }

    fn persist(&mut self, key: SettingsKey, value: &str) {
        if let Err(err) = self.store.set(key.as_str(), value) {
            warn!(key = %key, error = %err, "Failed to persist setting");
        }
    }

    // ---------------------------------------------------------------------
    // Rendering
    // ---------------------------------------------------------------------

    /// Snapshot for rendering
    pub fn view(&self) -> PlayerView {
        let shown_volume = if self.transport.is_muted {
            0.0
        } else {
            f64::from(self.transport.volume)
        };

        PlayerView {
            phase: self.phase(),
            is_playing: self.transport.is_playing,
            is_muted: self.transport.is_muted,
            volume: self.transport.volume,
            volume_label: format_volume(f64::from(self.transport.volume)),
            current_time: self.transport.current_time,
            duration: self.transport.duration,
            current_time_label: format_time(self.transport.current_time),
            duration_label: format_time(self.transport.duration),
            timeline_fill: self.timeline.fill_percent(self.transport.current_time),
            volume_fill: self.volume_slider.fill_percent(shown_volume),
            volume_icon_muted: self.transport.is_muted || self.transport.volume == 0,
            controls_visible: self.controls_visible,
            big_icon: self.big_icon,
            seeking: self.seeking,
            show_no_source_overlay: !self.has_source(),
            settings_open: self.settings_open,
            fullscreen: self.fullscreen.is_fullscreen(),
            timeline_tooltip: self.timeline.tooltip(),
            volume_tooltip: self.volume_slider.tooltip(),
            frame_step: self.settings.frame_step,
            playback_rate: self.settings.playback_rate,
            source_url: self.settings.source_url.clone(),
        }
    }
}

/// Clamp a playhead target to `[0, duration]`, or `[0, inf)` before metadata
fn clamp_time(seconds: f64, duration: f64) -> f64 {
    let seconds = seconds.max(0.0);
    if duration > 0.0 {
        seconds.min(duration)
    } else {
        seconds
    }
}
