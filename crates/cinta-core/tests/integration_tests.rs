//! Integration tests for Cinta Core

use std::time::Duration;

use cinta_core::{
    format_time, BigIcon, Error, HeadlessFullscreen, HeadlessMedia, KeyInput, ManualScheduler,
    MediaEvent, MemoryStore, PlayerPhase, PlayerShell, PointerSample, Result, ScrubInput,
    SettingsForm, SettingsStore, ShellConfig, Slider, TrackBounds,
};

struct Player {
    shell: PlayerShell,
    media: HeadlessMedia,
    store: MemoryStore,
    clock: ManualScheduler,
    fullscreen: HeadlessFullscreen,
}

impl Player {
    fn with(config: ShellConfig, store: MemoryStore) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("cinta_core=debug")
            .try_init();

        let media = HeadlessMedia::new();
        let clock = ManualScheduler::new();
        let fullscreen = HeadlessFullscreen::new();
        let mut shell =
            PlayerShell::new(config, store.clone(), clock.clone(), fullscreen.clone()).unwrap();
        shell.attach_media(media.clone());

        Self {
            shell,
            media,
            store,
            clock,
            fullscreen,
        }
    }

    fn new() -> Self {
        Self::with(ShellConfig::default(), MemoryStore::new())
    }

    /// Load a source and deliver its metadata
    fn load(&mut self, url: &str, duration: f64) {
        self.shell.load_source(url);
        self.media.set_duration(duration);
        self.shell.handle_media_event(MediaEvent::LoadedMetadata);
    }

    fn key(&mut self, code: &str) -> bool {
        self.shell.handle_key(&KeyInput::new(code))
    }

    fn advance(&mut self, millis: u64) {
        for kind in self.clock.advance(Duration::from_millis(millis)) {
            self.shell.handle_timer(kind);
        }
    }
}

// =============================================================================
// Transport Tests
// =============================================================================

#[test]
fn test_space_plays_and_flashes_big_icon() {
    let mut player = Player::new();
    player.load("video.mp4", 120.0);
    assert_eq!(player.shell.phase(), PlayerPhase::LoadedPaused);

    assert!(player.key("Space"));
    assert!(player.shell.transport().is_playing);
    assert!(player.media.snapshot().playing);
    assert_eq!(player.media.snapshot().plays, 1);
    assert_eq!(player.shell.phase(), PlayerPhase::LoadedPlaying);
    assert_eq!(player.shell.big_icon(), Some(BigIcon::Play));

    player.advance(499);
    assert_eq!(player.shell.big_icon(), Some(BigIcon::Play));
    player.advance(1);
    assert_eq!(player.shell.big_icon(), None);

    assert!(player.key("KeyK"));
    assert!(!player.media.snapshot().playing);
    assert_eq!(player.shell.big_icon(), Some(BigIcon::Pause));
}

#[test]
fn test_rapid_toggle_restarts_big_icon() {
    let mut player = Player::new();
    player.load("video.mp4", 120.0);

    player.shell.toggle_play();
    player.advance(200);
    player.shell.toggle_play();
    assert_eq!(player.shell.big_icon(), Some(BigIcon::Pause));

    // The first icon would have expired here
    player.advance(300);
    assert_eq!(player.shell.big_icon(), Some(BigIcon::Pause));
    player.advance(200);
    assert_eq!(player.shell.big_icon(), None);
}

#[test]
fn test_seek_keys_pause_playback() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);

    for (code, expected) in [
        ("ArrowRight", 5.0),
        ("KeyL", 15.0),
        ("ArrowLeft", 10.0),
        ("KeyJ", 0.0),
    ] {
        player.shell.toggle_play();
        assert!(player.media.snapshot().playing);

        player.key(code);
        assert!(!player.shell.transport().is_playing, "{code} left playback running");
        assert!(!player.media.snapshot().playing);
        assert_eq!(player.shell.transport().current_time, expected);
    }
}

#[test]
fn test_frame_step_is_exact_and_pauses() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    player.shell.seek_to(10.0);
    player.shell.toggle_play();

    player.key("Period");
    assert_eq!(player.shell.transport().current_time, 10.0 + 1.0 / 30.0);
    assert!(!player.shell.transport().is_playing);
    assert!(!player.media.snapshot().playing);

    player.key("Comma");
    player.key("Comma");
    assert_eq!(
        player.shell.transport().current_time,
        10.0 + 1.0 / 30.0 - 1.0 / 30.0 - 1.0 / 30.0
    );
}

#[test]
fn test_seek_keys() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);

    player.key("ArrowRight");
    assert_eq!(player.shell.transport().current_time, 5.0);
    player.key("KeyL");
    assert_eq!(player.shell.transport().current_time, 15.0);
    player.key("KeyJ");
    player.key("ArrowLeft");
    assert_eq!(player.shell.transport().current_time, 0.0);
    player.key("ArrowLeft");
    assert_eq!(player.shell.transport().current_time, 0.0);
}

#[test]
fn test_frame_step_follows_declared_rate() {
    let store = MemoryStore::with_entries([("frames", "24")]);
    let mut player = Player::with(ShellConfig::default(), store);
    player.load("video.mp4", 60.0);

    player.key("Period");
    assert_eq!(player.shell.transport().current_time, 1.0 / 24.0);
}

#[test]
fn test_unknown_and_typing_keys_ignored() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);

    assert!(!player.key("KeyQ"));
    assert!(!player.shell.handle_key(&KeyInput::typing("Space")));
    assert!(!player.shell.transport().is_playing);
}

// =============================================================================
// Volume Tests
// =============================================================================

#[test]
fn test_arrow_down_eleven_times_mutes_at_floor() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);

    for press in 1..=11 {
        player.key("ArrowDown");
        let volume = player.shell.transport().volume;
        assert_eq!(u32::from(volume), 100u32.saturating_sub(press * 10));
    }
    assert_eq!(player.shell.transport().volume, 0);
    assert!(player.shell.transport().is_muted);
    assert!(player.media.snapshot().muted);
    assert_eq!(player.store.get("volume").as_deref(), Some("0"));
    assert_eq!(player.store.get("muted").as_deref(), Some("true"));
}

#[test]
fn test_arrow_up_unmutes_and_clamps() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    player.key("KeyM");
    assert!(player.shell.transport().is_muted);

    player.key("ArrowUp");
    assert!(!player.shell.transport().is_muted);
    assert_eq!(player.shell.transport().volume, 100);

    for _ in 0..3 {
        player.key("ArrowDown");
    }
    for _ in 0..10 {
        player.key("ArrowUp");
        assert!(player.shell.transport().volume <= 100);
    }
    assert_eq!(player.shell.transport().volume, 100);
    assert_eq!(player.media.snapshot().volume, 1.0);
}

#[test]
fn test_volume_keys_reveal_controls() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);

    player.key("ArrowUp");
    assert!(player.shell.controls_visible());
    player.advance(700);
    assert!(!player.shell.controls_visible());
}

#[test]
fn test_zero_volume_and_mute_are_distinct() {
    let store = MemoryStore::with_entries([("volume", "0"), ("muted", "false")]);
    let mut player = Player::with(ShellConfig::default(), store);
    player.load("video.mp4", 60.0);

    assert_eq!(player.shell.transport().volume, 0);
    assert!(!player.shell.transport().is_muted);
    assert!(player.shell.view().volume_icon_muted);

    player.key("KeyM");
    player.key("KeyM");
    assert_eq!(player.shell.transport().volume, 0);
    assert!(!player.shell.transport().is_muted);
}

#[test]
fn test_volume_slider_unmutes() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    player.key("KeyM");
    assert_eq!(player.shell.view().volume_fill, 0.0);

    let track = TrackBounds::new(0.0, 200.0);
    let committed = player
        .shell
        .scrub(Slider::Volume, ScrubInput::Down(PointerSample::mouse(100.0), track));
    assert_eq!(committed, Some(50.0));
    assert!(!player.shell.transport().is_muted);
    assert_eq!(player.shell.transport().volume, 50);
    assert_eq!(player.media.snapshot().volume, 0.5);
    assert_eq!(player.store.get("volume").as_deref(), Some("50"));
    assert_eq!(player.shell.view().volume_fill, 50.0);
}

// =============================================================================
// Scrubber Tests
// =============================================================================

#[test]
fn test_timeline_drag_commits_live() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    let track = TrackBounds::new(0.0, 200.0);

    let first = player
        .shell
        .scrub(Slider::Timeline, ScrubInput::Down(PointerSample::mouse(50.0), track));
    assert_eq!(first, Some(15.0));
    assert_eq!(player.media.snapshot().current_time, 15.0);

    let second = player
        .shell
        .scrub(Slider::Timeline, ScrubInput::Move(PointerSample::mouse(160.0), track));
    assert_eq!(second, Some(48.0));
    assert_eq!(player.shell.transport().current_time, 48.0);
    assert!(player.shell.is_dragging(Slider::Timeline));

    assert_eq!(player.shell.scrub(Slider::Timeline, ScrubInput::Up), Some(48.0));
    assert!(!player.shell.is_dragging(Slider::Timeline));
}

#[test]
fn test_drag_outside_track_clamps() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    let track = TrackBounds::new(10.0, 200.0);

    player
        .shell
        .scrub(Slider::Timeline, ScrubInput::Down(PointerSample::mouse(110.0), track));
    assert_eq!(player.shell.transport().current_time, 30.0);

    player
        .shell
        .scrub(Slider::Timeline, ScrubInput::Move(PointerSample::mouse(900.0), track));
    assert_eq!(player.shell.transport().current_time, 60.0);

    player
        .shell
        .scrub(Slider::Timeline, ScrubInput::Move(PointerSample::touch(-50.0), track));
    assert_eq!(player.shell.scrub(Slider::Timeline, ScrubInput::Up), Some(0.0));
    assert_eq!(player.shell.transport().current_time, 0.0);
}

#[test]
fn test_hover_previews_without_committing() {
    let mut player = Player::new();
    player.load("video.mp4", 100.0);
    let track = TrackBounds::new(0.0, 400.0);

    player.shell.scrub(Slider::Timeline, ScrubInput::Enter);
    let committed = player
        .shell
        .scrub(Slider::Timeline, ScrubInput::Move(PointerSample::mouse(300.0), track));
    assert_eq!(committed, None);
    assert_eq!(player.shell.transport().current_time, 0.0);

    let tooltip = player.shell.view().timeline_tooltip.unwrap();
    assert_eq!(tooltip.text, format_time(75.0));
    assert_eq!(tooltip.left_percent, 75.0);

    player.shell.scrub(Slider::Timeline, ScrubInput::Leave);
    assert!(player.shell.view().timeline_tooltip.is_none());
}

#[test]
fn test_timeline_before_metadata() {
    let mut player = Player::new();
    player.shell.load_source("video.mp4");
    let track = TrackBounds::new(0.0, 200.0);

    let committed = player
        .shell
        .scrub(Slider::Timeline, ScrubInput::Down(PointerSample::mouse(120.0), track));
    assert_eq!(committed, Some(0.0));
    assert_eq!(player.shell.view().timeline_fill, 0.0);
    assert_eq!(player.shell.view().duration_label, "0:00");
}

// =============================================================================
// Controls Visibility Tests
// =============================================================================

#[test]
fn test_controls_hide_after_inactivity() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);

    player.shell.pointer_activity();
    assert!(player.shell.controls_visible());

    player.advance(600);
    player.shell.pointer_activity();
    player.advance(600);
    assert!(player.shell.controls_visible());
    player.advance(100);
    assert!(!player.shell.controls_visible());
}

#[test]
fn test_controls_stay_hidden_without_source() {
    let mut player = Player::new();
    player.shell.pointer_enter();
    player.shell.pointer_activity();
    player.shell.click_video();

    assert!(!player.shell.controls_visible());
    assert!(player.shell.view().show_no_source_overlay);
}

#[test]
fn test_pointer_leave_schedules_hide() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);

    player.shell.pointer_enter();
    player.advance(5000);
    assert!(player.shell.controls_visible());

    player.shell.pointer_leave();
    player.advance(700);
    assert!(!player.shell.controls_visible());
}

#[test]
fn test_touch_tap_toggles_overlay_only() {
    let mut player = Player::with(ShellConfig::touch(), MemoryStore::new());
    player.load("video.mp4", 60.0);

    player.shell.click_video();
    assert!(player.shell.controls_visible());
    assert!(!player.shell.transport().is_playing);

    player.shell.click_video();
    assert!(!player.shell.controls_visible());
    assert!(!player.media.snapshot().playing);
}

#[test]
fn test_mouse_click_toggles_playback() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);

    player.shell.click_video();
    assert!(player.shell.transport().is_playing);
    assert!(player.shell.controls_visible());
}

// =============================================================================
// Fullscreen & Settings Panel Tests
// =============================================================================

#[test]
fn test_fullscreen_toggle() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);

    player.key("KeyF");
    assert!(player.shell.is_fullscreen());
    assert_eq!(player.shell.phase(), PlayerPhase::Fullscreen);
    player.key("KeyF");
    assert!(!player.shell.is_fullscreen());
}

#[test]
fn test_opening_settings_pauses() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    player.shell.toggle_play();

    player.shell.open_settings();
    assert_eq!(player.shell.phase(), PlayerPhase::SettingsOpen);
    assert!(!player.media.snapshot().playing);
    assert!(!player.shell.transport().is_playing);
}

#[test]
fn test_fullscreen_restored_after_settings() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    player.shell.toggle_fullscreen();

    player.shell.open_settings();
    // File pickers knock the browser out of fullscreen
    player.fullscreen.force_exit();

    let form = player.shell.settings_form();
    player.shell.submit_settings(&form).unwrap();
    assert!(!player.shell.is_settings_open());
    assert!(player.shell.is_fullscreen());
}

#[test]
fn test_escape_exits_and_forgets_fullscreen() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    player.shell.toggle_fullscreen();
    player.shell.open_settings();

    assert!(player.key("Escape"));
    assert!(!player.shell.is_fullscreen());
    assert!(!player.shell.is_settings_open());
    assert_eq!(player.shell.phase(), PlayerPhase::LoadedPaused);
}

#[test]
fn test_submit_velocity_without_reload() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    player.shell.open_settings();

    let form = SettingsForm {
        velocity: "1.5".to_string(),
        ..player.shell.settings_form()
    };
    let outcome = player.shell.submit_settings(&form).unwrap();

    assert!(outcome.rate_changed);
    assert!(!outcome.reloaded);
    assert_eq!(player.media.snapshot().loads, 1);
    assert_eq!(player.media.snapshot().playback_rate, 1.5);
    assert_eq!(player.store.get("velocity").as_deref(), Some("1.5"));
    assert_eq!(player.store.get("frames").as_deref(), Some("30"));
}

#[test]
fn test_submit_new_url_reloads() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    player.shell.toggle_play();

    let mut form = player.shell.settings_form();
    form.select_file_url("blob:other");
    form.frames = "60".to_string();
    let outcome = player.shell.submit_settings(&form).unwrap();

    assert!(outcome.reloaded);
    assert!(!outcome.rate_changed);
    let media = player.media.snapshot();
    assert_eq!(media.loads, 2);
    assert_eq!(media.source.as_deref(), Some("blob:other"));
    assert!(!player.shell.transport().is_playing);
    assert_eq!(player.shell.settings().frame_step, 60);
}

#[test]
fn test_submit_rejects_malformed_input() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    player.shell.open_settings();

    let form = SettingsForm {
        frames: "0".to_string(),
        ..player.shell.settings_form()
    };
    let err = player.shell.submit_settings(&form).unwrap_err();

    assert!(matches!(err, Error::InvalidSetting { field: "frames", .. }));
    assert!(err.is_recoverable());
    assert!(player.shell.is_settings_open());
    assert!(player.store.get("frames").is_none());
}

#[test]
fn test_submit_empty_url_returns_to_idle() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    player.shell.pointer_activity();

    let form = SettingsForm {
        source_url: String::new(),
        ..player.shell.settings_form()
    };
    player.shell.submit_settings(&form).unwrap();

    assert_eq!(player.shell.phase(), PlayerPhase::IdleNoSource);
    assert!(!player.shell.controls_visible());
    assert_eq!(player.media.snapshot().source, None);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_persisted_preferences_applied_on_attach() {
    let store = MemoryStore::with_entries([
        ("volume", "40"),
        ("muted", "true"),
        ("velocity", "2"),
    ]);
    let player = Player::with(ShellConfig::default(), store);

    let media = player.media.snapshot();
    assert_eq!(media.volume, 0.4);
    assert!(media.muted);
    assert_eq!(media.playback_rate, 2.0);
}

#[test]
fn test_clear_settings_restores_defaults() {
    let mut player = Player::new();
    player.load("video.mp4", 60.0);
    player.key("ArrowDown");
    player.key("KeyM");
    assert!(!player.store.is_empty());

    player.shell.clear_settings().unwrap();
    assert!(player.store.is_empty());
    assert_eq!(player.shell.transport().volume, 100);
    assert!(!player.shell.transport().is_muted);
    assert_eq!(player.shell.settings().source_url.as_deref(), Some("video.mp4"));
}

struct ReadOnlyStore;

impl SettingsStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(Error::storage_write(key, "quota exceeded"))
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        Err(Error::StorageUnavailable("read-only".to_string()))
    }
}

#[test]
fn test_storage_failures_are_not_fatal() {
    let media = HeadlessMedia::new();
    let mut shell = PlayerShell::new(
        ShellConfig::default(),
        ReadOnlyStore,
        ManualScheduler::new(),
        HeadlessFullscreen::new(),
    )
    .unwrap();
    shell.attach_media(media.clone());
    shell.load_source("video.mp4");

    shell.volume_down();
    assert_eq!(shell.transport().volume, 90);
    assert_eq!(media.snapshot().volume, 0.9);
    assert!(matches!(
        shell.clear_settings(),
        Err(Error::StorageUnavailable(_))
    ));
}

// =============================================================================
// View Tests
// =============================================================================

#[test]
fn test_view_labels() {
    let mut player = Player::new();
    player.load("video.mp4", 75.0);
    player.shell.seek_to(30.0);

    let view = player.shell.view();
    assert_eq!(view.current_time_label, "0:30");
    assert_eq!(view.duration_label, "1:15");
    assert_eq!(view.volume_label, "100%");
    assert_eq!(view.timeline_fill, 40.0);
    assert_eq!(view.phase, PlayerPhase::LoadedPaused);
    assert!(!view.show_no_source_overlay);
}

#[test]
fn test_invalid_config_rejected() {
    let config = ShellConfig {
        seek_step: 0.0,
        ..Default::default()
    };
    let result = PlayerShell::new(
        config,
        MemoryStore::new(),
        ManualScheduler::new(),
        HeadlessFullscreen::new(),
    );
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}
