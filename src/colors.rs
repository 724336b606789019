//! Color space conversion helpers.
//!
//! HSV is easier to reason about than raw channel bytes when picking stimulus
//! colors (hue wheels, equal-brightness sets). These helpers convert through
//! `palette` and scale the result to a maximum channel intensity, so a queue
//! can be filled with colors as dim as the defaults.

use palette::{FromColor, Hsv, Srgb};

use crate::types::Rgbw;

/// Creates a stimulus color from HSV components.
///
/// `hue` is in degrees, `saturation` and `value` in 0.0-1.0. Channels are
/// scaled so a fully-on component equals `max_level`. White is off.
#[inline]
pub fn hsv(hue: f32, saturation: f32, value: f32, max_level: u8) -> Rgbw {
    let rgb: Srgb = Srgb::from_color(Hsv::new(hue, saturation, value));
    let scale = |component: f32| (component.clamp(0.0, 1.0) * max_level as f32 + 0.5) as u8;
    Rgbw::rgb(scale(rgb.red), scale(rgb.green), scale(rgb.blue))
}

/// Creates a fully saturated stimulus color from hue only.
#[inline]
pub fn hue(hue: f32, max_level: u8) -> Rgbw {
    hsv(hue, 1.0, 1.0, max_level)
}
