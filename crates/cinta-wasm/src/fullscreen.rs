//! Fullscreen API adapter

use cinta_core::Fullscreen;
use web_sys::{Document, HtmlElement};

use crate::console_warn;

/// Class set on the container while it is fullscreen
pub const FULLSCREEN_CLASS: &str = "full-screen";

/// Native fullscreen for the player container.
///
/// Requests resolve asynchronously, so `is_fullscreen` reflects the document
/// state, not the last request.
#[derive(Clone)]
pub struct DocumentFullscreen {
    document: Document,
    container: HtmlElement,
}

impl DocumentFullscreen {
    pub fn new(document: Document, container: HtmlElement) -> Self {
        Self {
            document,
            container,
        }
    }

    /// Mirror the document state onto the container class
    pub fn sync_class(&self) {
        let active = self.is_fullscreen();
        if let Err(err) = self
            .container
            .class_list()
            .toggle_with_force(FULLSCREEN_CLASS, active)
        {
            console_warn(&format!("Failed to toggle fullscreen class: {err:?}"));
        }
    }
}

impl Fullscreen for DocumentFullscreen {
    fn is_fullscreen(&self) -> bool {
        self.document.fullscreen_element().is_some()
    }

    fn request(&mut self) {
        if let Err(err) = self.container.request_fullscreen() {
            console_warn(&format!("Fullscreen request failed: {err:?}"));
        }
    }

    fn exit(&mut self) {
        self.document.exit_fullscreen();
    }
}
