//! Color helpers for the status light strip.
//!
//! Patterns work in `palette::Srgb<f32>`. The rainbow pattern walks a 16-bit
//! hue wheel (`0..HUE_WHEEL`) so hue arithmetic stays integral and wraps for
//! free; [`wheel_hue`] converts a wheel position into a color.

use palette::{FromColor, Hsv, LinSrgb, Srgb};

/// Number of discrete positions on the hue wheel.
pub const HUE_WHEEL: u32 = 65_536;

/// All channels off.
pub const OFF: Srgb = Srgb::new(0.0, 0.0, 0.0);

/// Full red, used by the scanner and the error blink.
pub const RED: Srgb = Srgb::new(1.0, 0.0, 0.0);

/// Amber (255, 125, 0), used by the working blink.
pub const AMBER: Srgb = Srgb::new(1.0, 125.0 / 255.0, 0.0);

/// Creates an RGB color from HSV (Hue, Saturation, Value) components.
#[inline]
pub fn hsv(hue: f32, saturation: f32, value: f32) -> Srgb {
    let hsv = Hsv::new(hue, saturation, value);
    Srgb::from_color(hsv)
}

/// Creates an RGB color from hue only (full saturation and value).
#[inline]
pub fn hue(hue: f32) -> Srgb {
    hsv(hue, 1.0, 1.0)
}

/// Converts a hue wheel position to degrees (0.0..360.0).
#[inline]
pub fn wheel_to_degrees(position: u16) -> f32 {
    position as f32 * 360.0 / HUE_WHEEL as f32
}

/// Fully saturated color at a hue wheel position.
#[inline]
pub fn wheel_hue(position: u16) -> Srgb {
    hue(wheel_to_degrees(position))
}

/// Hue wheel position of pixel `index` when the wheel is spread evenly over
/// `count` pixels starting at `base`.
///
/// `count` must be non-zero.
#[inline]
pub fn pixel_hue(base: u16, index: usize, count: usize) -> u16 {
    let spacing = HUE_WHEEL / count as u32;
    let offset = (index as u32).wrapping_mul(spacing);
    ((base as u32 + offset) % HUE_WHEEL) as u16
}

/// Perceptual correction for LED drive levels.
///
/// Decodes the sRGB transfer curve (roughly a 2.2 power) so mid-range values
/// are not washed out on the strip. This is slightly brighter in the mid
/// tones than the 2.6 power table of Adafruit NeoPixel's `gamma32`; 50% input
/// drives about 21% rather than 17%. Endpoints are unchanged.
#[inline]
pub fn gamma(color: Srgb) -> Srgb {
    let linear: LinSrgb = color.into_linear();
    Srgb::new(linear.red, linear.green, linear.blue)
}

/// Scales every channel by `factor` (clamped to 0.0..=1.0).
#[inline]
pub fn scale(color: Srgb, factor: f32) -> Srgb {
    let factor = factor.clamp(0.0, 1.0);
    Srgb::new(color.red * factor, color.green * factor, color.blue * factor)
}
