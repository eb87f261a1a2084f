//! `<video>` element adapter

use cinta_core::MediaElement;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

use crate::console_warn;

/// Media element backed by an `HtmlVideoElement`
pub struct VideoElement {
    element: HtmlVideoElement,
}

impl VideoElement {
    pub fn new(element: HtmlVideoElement) -> Self {
        Self { element }
    }
}

impl MediaElement for VideoElement {
    fn play(&mut self) {
        match self.element.play() {
            // Autoplay policies reject the promise; the element stays paused
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    console_warn(&format!("play() rejected: {err:?}"));
                }
            }),
            Err(err) => console_warn(&format!("play() failed: {err:?}")),
        }
    }

    fn pause(&mut self) {
        if let Err(err) = self.element.pause() {
            console_warn(&format!("pause() failed: {err:?}"));
        }
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.element.duration()
    }

    fn set_volume(&mut self, volume: f64) {
        self.element.set_volume(volume.clamp(0.0, 1.0));
    }

    fn set_muted(&mut self, muted: bool) {
        self.element.set_muted(muted);
    }

    fn playback_rate(&self) -> f64 {
        self.element.playback_rate()
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.element.set_playback_rate(rate);
    }

    fn source(&self) -> Option<String> {
        self.element
            .get_attribute("src")
            .filter(|src| !src.is_empty())
    }

    fn set_source(&mut self, url: Option<&str>) {
        match url {
            Some(url) => self.element.set_src(url),
            None => {
                if let Err(err) = self.element.remove_attribute("src") {
                    console_warn(&format!("Failed to clear source: {err:?}"));
                }
            }
        }
    }

    fn load(&mut self) {
        self.element.load();
    }
}
