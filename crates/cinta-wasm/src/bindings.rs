//! Per-scrubber track bindings

use cinta_core::Slider;

/// One binding per slider; binding again replaces and drops the previous one
pub struct SliderBindings<T> {
    timeline: Option<T>,
    volume: Option<T>,
}

impl<T> Default for SliderBindings<T> {
    fn default() -> Self {
        Self {
            timeline: None,
            volume: None,
        }
    }
}

impl<T> SliderBindings<T> {
    pub fn get(&self, slider: Slider) -> Option<&T> {
        match slider {
            Slider::Timeline => self.timeline.as_ref(),
            Slider::Volume => self.volume.as_ref(),
        }
    }

    /// Install a binding, returning the one it replaced
    pub fn bind(&mut self, slider: Slider, binding: T) -> Option<T> {
        let slot = match slider {
            Slider::Timeline => &mut self.timeline,
            Slider::Volume => &mut self.volume,
        };
        slot.replace(binding)
    }

    pub fn clear(&mut self) {
        self.timeline = None;
        self.volume = None;
    }
}
