//! RGBA colors and palette inversion

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color, laid out to match a packed pixel buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Opaque grey from a normalized level (0 = black, 1 = white)
    pub fn gray(level: f32) -> Self {
        let v = to_channel(level);
        Self::rgb(v, v, v)
    }

    /// Scale every channel (premultiplied alpha fade)
    pub fn faded(self, amount: f32) -> Self {
        let scale = |c: u8| to_channel(c as f32 / 255.0 * amount);
        Self::rgba(scale(self.r), scale(self.g), scale(self.b), scale(self.a))
    }

    /// Negative of the color; the result is always opaque
    pub fn inverted(self) -> Self {
        Self::rgb(255 - self.r, 255 - self.g, 255 - self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[inline]
fn to_channel(level: f32) -> u8 {
    (level.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Invert an RGBA8 pixel buffer, leaving pixels equal to `exclude` untouched
///
/// [`SpriteSheet`](super::SpriteSheet) derives its night variant with this.
///
/// # Panics
///
/// Panics if `pixels` is not a whole number of RGBA pixels.
pub fn invert_colors(pixels: &[u8], exclude: Option<Color>) -> Vec<u8> {
    assert!(
        pixels.len() % 4 == 0,
        "pixel buffer length {} is not a multiple of 4",
        pixels.len()
    );
    let source: &[Color] = bytemuck::cast_slice(pixels);
    let inverted: Vec<Color> = source
        .iter()
        .map(|&p| if Some(p) == exclude { p } else { p.inverted() })
        .collect();
    bytemuck::cast_slice(&inverted).to_vec()
}
