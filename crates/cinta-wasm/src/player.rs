//! `CintaPlayer` - the JavaScript-facing player
//!
//! Wires DOM events into a [`PlayerShell`] and reports every state change
//! through the `onRender` callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use cinta_core::{
    input::is_touch_user_agent, KeyInput, MediaEvent, PlayerShell, ScrubInput, SettingsForm,
    ShellConfig, Slider, TrackBounds,
};
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, File, HtmlElement, HtmlVideoElement, KeyboardEvent,
    MouseEvent, TouchEvent, Url,
};

use crate::{
    bindings::SliderBindings,
    console_warn,
    events::{is_typing, mouse_sample, touch_sample, track_bounds, Subscription},
    fullscreen::DocumentFullscreen,
    media::VideoElement,
    object_urls::ObjectUrls,
    storage::LocalSettingsStore,
    timers::BrowserScheduler,
    to_js_error,
};

type Shared = Rc<RefCell<PlayerInner>>;

/// A scrubber track and the listeners on it
struct TrackBinding {
    track: Element,
    _listeners: Vec<Subscription>,
}

/// Document listeners that exist only while a scrubber drag is in flight
struct DragSession {
    slider: Slider,
    _listeners: Vec<Subscription>,
}

struct PlayerInner {
    shell: PlayerShell,
    document: Document,
    video: HtmlVideoElement,
    container: HtmlElement,
    fullscreen: DocumentFullscreen,
    tracks: SliderBindings<TrackBinding>,
    on_render: Option<js_sys::Function>,
    listeners: Vec<Subscription>,
    drag: Option<DragSession>,
    object_urls: ObjectUrls,
}

/// Video player bound to a `<video>` element and its container
#[wasm_bindgen]
pub struct CintaPlayer {
    inner: Shared,
}

#[wasm_bindgen]
impl CintaPlayer {
    /// Create a player.
    ///
    /// `config` is an optional object with `ShellConfig` fields. Without it,
    /// touch behavior is chosen from the user agent.
    #[wasm_bindgen(constructor)]
    pub fn new(
        video: HtmlVideoElement,
        container: HtmlElement,
        config: JsValue,
    ) -> Result<CintaPlayer, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("document unavailable"))?;

        let config = if config.is_undefined() || config.is_null() {
            let user_agent = window.navigator().user_agent().unwrap_or_default();
            ShellConfig {
                touch_device: is_touch_user_agent(&user_agent),
                ..ShellConfig::default()
            }
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        // Timers fire into the player once it exists
        let timer_target: Rc<RefCell<Weak<RefCell<PlayerInner>>>> = Rc::default();
        let scheduler = BrowserScheduler::new({
            let timer_target = Rc::clone(&timer_target);
            move |kind| {
                let target = timer_target.borrow().clone();
                if let Some(inner) = target.upgrade() {
                    dispatch(&inner, |p| p.shell.handle_timer(kind));
                }
            }
        });

        let fullscreen = DocumentFullscreen::new(document.clone(), container.clone());
        let mut shell = PlayerShell::new(
            config,
            LocalSettingsStore::new(),
            scheduler,
            fullscreen.clone(),
        )
        .map_err(to_js_error)?;
        shell.attach_media(VideoElement::new(video.clone()));

        let inner = Rc::new(RefCell::new(PlayerInner {
            shell,
            document,
            video,
            container,
            fullscreen,
            tracks: SliderBindings::default(),
            on_render: None,
            listeners: Vec::new(),
            drag: None,
            object_urls: ObjectUrls::default(),
        }));
        *timer_target.borrow_mut() = Rc::downgrade(&inner);

        let listeners = element_listeners(&inner)?;
        inner.borrow_mut().listeners = listeners;

        Ok(CintaPlayer { inner })
    }

    /// Attach the timeline scrubber to its track element
    #[wasm_bindgen(js_name = bindTimeline)]
    pub fn bind_timeline(&self, track: Element) -> Result<(), JsValue> {
        bind_track(&self.inner, Slider::Timeline, track)
    }

    /// Attach the volume scrubber to its track element
    #[wasm_bindgen(js_name = bindVolume)]
    pub fn bind_volume(&self, track: Element) -> Result<(), JsValue> {
        bind_track(&self.inner, Slider::Volume, track)
    }

    /// Register a callback receiving the view after every state change
    #[wasm_bindgen(js_name = onRender)]
    pub fn on_render(&self, callback: js_sys::Function) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.on_render = Some(callback);
        }
        dispatch(&self.inner, |_| ());
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) {
        dispatch(&self.inner, |p| p.shell.toggle_play());
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) {
        dispatch(&self.inner, |p| p.shell.toggle_mute());
    }

    #[wasm_bindgen(js_name = toggleFullscreen)]
    pub fn toggle_fullscreen(&self) {
        dispatch(&self.inner, |p| p.shell.toggle_fullscreen());
    }

    #[wasm_bindgen(js_name = openSettings)]
    pub fn open_settings(&self) {
        dispatch(&self.inner, |p| p.shell.open_settings());
    }

    #[wasm_bindgen(js_name = closeSettings)]
    pub fn close_settings(&self) {
        dispatch(&self.inner, |p| p.shell.close_settings());
    }

    /// Load a source URL directly, bypassing the settings form
    #[wasm_bindgen(js_name = loadSource)]
    pub fn load_source(&self, url: String) {
        dispatch(&self.inner, |p| {
            p.shell.load_source(&url);
            let current = p.shell.settings().source_url.clone();
            revoke_object_urls(p.object_urls.release_unused(current.as_deref()));
        });
    }

    /// Create a playable URL for a picked file, for the form's URL field
    #[wasm_bindgen(js_name = selectFile)]
    pub fn select_file(&self, file: File) -> Result<String, JsValue> {
        let url = Url::create_object_url_with_blob(&file)?;
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.object_urls.track(url.clone());
        }
        Ok(url)
    }

    /// Apply the settings panel; malformed numbers are rejected
    #[wasm_bindgen(js_name = submitSettings)]
    pub fn submit_settings(
        &self,
        url: String,
        frames: String,
        velocity: String,
    ) -> Result<(), JsValue> {
        let form = SettingsForm {
            source_url: url,
            frames,
            velocity,
        };
        dispatch(&self.inner, |p| {
            let outcome = p.shell.submit_settings(&form);
            let current = p.shell.settings().source_url.clone();
            revoke_object_urls(p.object_urls.settle(&outcome, current.as_deref()));
            outcome
        })
        .ok_or_else(|| JsValue::from_str("player busy"))?
        .map(|_| ())
        .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = clearSettings)]
    pub fn clear_settings(&self) -> Result<(), JsValue> {
        dispatch(&self.inner, |p| p.shell.clear_settings())
            .ok_or_else(|| JsValue::from_str("player busy"))?
            .map_err(to_js_error)
    }

    /// Current view as a plain object
    pub fn view(&self) -> Result<JsValue, JsValue> {
        let view = self
            .inner
            .try_borrow()
            .map_err(|_| JsValue::from_str("player busy"))?
            .shell
            .view();
        Ok(serde_wasm_bindgen::to_value(&view)?)
    }

    /// Remove every listener and release the video element
    pub fn destroy(&self) {
        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            console_warn("destroy() called while the player was busy");
            return;
        };
        inner.drag = None;
        inner.listeners.clear();
        inner.tracks.clear();
        inner.on_render = None;
        inner.shell.detach_media();
        revoke_object_urls(inner.object_urls.drain());
    }
}

impl PlayerInner {
    fn bounds(&self, slider: Slider) -> Option<TrackBounds> {
        self.tracks
            .get(slider)
            .map(|binding| track_bounds(&binding.track))
    }

    /// Attach or drop document drag listeners to match the scrubbers
    fn sync_drag(&mut self, this: &Weak<RefCell<PlayerInner>>) {
        let dragging = [Slider::Timeline, Slider::Volume]
            .into_iter()
            .find(|slider| self.shell.is_dragging(*slider));

        match (dragging, self.drag.as_ref().map(|drag| drag.slider)) {
            (Some(slider), Some(current)) if slider == current => {}
            (Some(slider), _) => match drag_listeners(&self.document, slider, this) {
                Ok(listeners) => {
                    self.drag = Some(DragSession {
                        slider,
                        _listeners: listeners,
                    })
                }
                Err(err) => console_warn(&format!("Failed to track drag: {err:?}")),
            },
            (None, Some(_)) => self.drag = None,
            (None, None) => {}
        }
    }
}

fn revoke_object_urls(urls: Vec<String>) {
    for url in urls {
        if let Err(err) = Url::revoke_object_url(&url) {
            console_warn(&format!("Failed to revoke {url}: {err:?}"));
        }
    }
}

/// Run `f` against the player, then sync drag listeners and render.
///
/// Returns `None` if the player is already borrowed by an outer handler.
fn dispatch<R>(inner: &Shared, f: impl FnOnce(&mut PlayerInner) -> R) -> Option<R> {
    let (result, render) = {
        let Ok(mut player) = inner.try_borrow_mut() else {
            console_warn("Re-entrant player event ignored");
            return None;
        };
        let result = f(&mut player);
        player.sync_drag(&Rc::downgrade(inner));
        let render = player
            .on_render
            .clone()
            .map(|callback| (callback, player.shell.view()));
        (result, render)
    };

    // The callback may call back into the player, so no borrow is held
    if let Some((callback, view)) = render {
        match serde_wasm_bindgen::to_value(&view) {
            Ok(view) => {
                if let Err(err) = callback.call1(&JsValue::NULL, &view) {
                    console_warn(&format!("onRender callback threw: {err:?}"));
                }
            }
            Err(err) => console_warn(&format!("Failed to encode view: {err}")),
        }
    }
    Some(result)
}

/// Subscribe `handler` to `event`, dispatching into the player
fn listen<E>(
    inner: &Shared,
    target: &EventTarget,
    event: &'static str,
    handler: impl Fn(&mut PlayerInner, E) + 'static,
) -> Result<Subscription, JsValue>
where
    E: JsCast + 'static,
{
    let weak = Rc::downgrade(inner);
    Subscription::new(target, event, move |event: E| {
        if let Some(inner) = weak.upgrade() {
            dispatch(&inner, |p| handler(p, event));
        }
    })
}

fn element_listeners(inner: &Shared) -> Result<Vec<Subscription>, JsValue> {
    let (video, container, document) = {
        let p = inner.borrow();
        (p.video.clone(), p.container.clone(), p.document.clone())
    };

    let mut listeners = Vec::new();
    for media_event in MediaEvent::ALL {
        listeners.push(listen(inner, &video, media_event.dom_name(), move |p, _: Event| {
            p.shell.handle_media_event(media_event)
        })?);
    }

    listeners.push(listen(inner, &video, "click", |p, _: MouseEvent| {
        p.shell.click_video()
    })?);
    listeners.push(listen(inner, &container, "mousemove", |p, _: MouseEvent| {
        p.shell.pointer_activity()
    })?);
    listeners.push(listen(inner, &container, "touchmove", |p, _: TouchEvent| {
        p.shell.pointer_activity()
    })?);
    listeners.push(listen(inner, &container, "mouseenter", |p, _: MouseEvent| {
        p.shell.pointer_enter()
    })?);
    listeners.push(listen(inner, &container, "mouseleave", |p, _: MouseEvent| {
        p.shell.pointer_leave()
    })?);

    listeners.push(listen(inner, &document, "keydown", |p, event: KeyboardEvent| {
        let key = KeyInput {
            code: event.code(),
            typing: is_typing(&event),
        };
        if p.shell.handle_key(&key) {
            event.prevent_default();
        }
    })?);
    listeners.push(listen(inner, &document, "fullscreenchange", |p, _: Event| {
        p.fullscreen.sync_class()
    })?);

    Ok(listeners)
}

fn bind_track(inner: &Shared, slider: Slider, track: Element) -> Result<(), JsValue> {
    let listeners = vec![
        listen(inner, &track, "mouseenter", move |p, _: MouseEvent| {
            p.shell.scrub(slider, ScrubInput::Enter);
        })?,
        listen(inner, &track, "mouseleave", move |p, _: MouseEvent| {
            p.shell.scrub(slider, ScrubInput::Leave);
        })?,
        listen(inner, &track, "mousedown", move |p, event: MouseEvent| {
            if let Some(bounds) = p.bounds(slider) {
                p.shell
                    .scrub(slider, ScrubInput::Down(mouse_sample(&event), bounds));
            }
        })?,
        listen(inner, &track, "touchstart", move |p, event: TouchEvent| {
            if let (Some(sample), Some(bounds)) = (touch_sample(&event), p.bounds(slider)) {
                p.shell.scrub(slider, ScrubInput::Down(sample, bounds));
            }
        })?,
        // Hover preview; drags are followed at document level
        listen(inner, &track, "mousemove", move |p, event: MouseEvent| {
            if p.shell.is_dragging(slider) {
                return;
            }
            if let Some(bounds) = p.bounds(slider) {
                p.shell
                    .scrub(slider, ScrubInput::Move(mouse_sample(&event), bounds));
            }
        })?,
    ];

    let mut player = inner
        .try_borrow_mut()
        .map_err(|_| JsValue::from_str("player busy"))?;
    // Dropping the previous binding removes its listeners
    player.tracks.bind(
        slider,
        TrackBinding {
            track,
            _listeners: listeners,
        },
    );
    Ok(())
}

fn drag_listeners(
    document: &Document,
    slider: Slider,
    this: &Weak<RefCell<PlayerInner>>,
) -> Result<Vec<Subscription>, JsValue> {
    let inner = this
        .upgrade()
        .ok_or_else(|| JsValue::from_str("player dropped"))?;

    Ok(vec![
        listen(&inner, document, "mousemove", move |p, event: MouseEvent| {
            if let Some(bounds) = p.bounds(slider) {
                p.shell
                    .scrub(slider, ScrubInput::Move(mouse_sample(&event), bounds));
            }
        })?,
        listen(&inner, document, "touchmove", move |p, event: TouchEvent| {
            if let (Some(sample), Some(bounds)) = (touch_sample(&event), p.bounds(slider)) {
                p.shell.scrub(slider, ScrubInput::Move(sample, bounds));
            }
        })?,
        listen(&inner, document, "mouseup", move |p, _: MouseEvent| {
            p.shell.scrub(slider, ScrubInput::Up);
        })?,
        listen(&inner, document, "touchend", move |p, _: TouchEvent| {
            p.shell.scrub(slider, ScrubInput::Up);
        })?,
    ])
}
