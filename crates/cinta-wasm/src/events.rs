//! DOM event subscriptions and input extraction

use cinta_core::{input::is_typing_target, PointerSample, TrackBounds};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

/// An event listener that is removed when dropped
pub struct Subscription {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Subscription {
    /// Listen for `event` on `target`, handing the handler a typed event
    pub fn new<E>(
        target: &EventTarget,
        event: &'static str,
        mut handler: impl FnMut(E) + 'static,
    ) -> Result<Self, JsValue>
    where
        E: JsCast + 'static,
    {
        let callback = Closure::wrap(Box::new(move |event: Event| {
            if let Ok(event) = event.dyn_into::<E>() {
                handler(event);
            }
        }) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;

        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let callback: &js_sys::Function = self.callback.as_ref().unchecked_ref();
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, callback);
    }
}

pub fn mouse_sample(event: &MouseEvent) -> PointerSample {
    PointerSample::mouse(f64::from(event.client_x()))
}

/// First active touch point; `None` on touch-end
pub fn touch_sample(event: &TouchEvent) -> Option<PointerSample> {
    let touches = event.touches();
    let xs: Vec<f64> = (0..touches.length())
        .filter_map(|i| touches.get(i))
        .map(|touch| f64::from(touch.client_x()))
        .collect();
    PointerSample::from_touches(&xs)
}

pub fn track_bounds(track: &Element) -> TrackBounds {
    let rect = track.get_bounding_client_rect();
    TrackBounds::new(rect.left(), rect.width())
}

/// Focus is in a text field, so shortcuts must not fire
pub fn is_typing(event: &KeyboardEvent) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<HtmlElement>().ok())
        .is_some_and(|element| {
            is_typing_target(&element.tag_name(), element.is_content_editable())
        })
}
