//! Cinta WASM - Browser bindings for the Cinta video player
//!
//! Binds a `<video>` element to the Cinta player shell:
//! - Keyboard shortcuts and pointer-driven timeline/volume scrubbers
//! - Preferences persisted in `localStorage`
//! - Controls auto-hide and play/pause feedback on browser timers
//! - Native fullscreen
//!
//! ## Usage
//!
//! ```javascript
//! import init, { CintaPlayer } from '@cinta/wasm';
//!
//! await init();
//! const player = new CintaPlayer(video, container);
//! player.bindTimeline(timelineTrack);
//! player.bindVolume(volumeTrack);
//! player.onRender((view) => render(view));
//! ```

use wasm_bindgen::prelude::*;

mod bindings;
mod events;
mod fullscreen;
mod media;
mod object_urls;
mod player;
mod storage;
mod timers;

pub use fullscreen::DocumentFullscreen;
pub use media::VideoElement;
pub use player::CintaPlayer;
pub use storage::LocalSettingsStore;
pub use timers::BrowserScheduler;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&format!("[Cinta WASM] Initialized v{}", cinta_core::VERSION).into());
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn console_warn(message: &str) {
    web_sys::console::warn_1(&format!("[Cinta WASM] {message}").into());
}

/// Errors cross the JS boundary as `"CODE: message"` strings
pub(crate) fn to_js_error(err: cinta_core::Error) -> JsValue {
    JsValue::from_str(&format!("{}: {}", err.error_code(), err))
}
