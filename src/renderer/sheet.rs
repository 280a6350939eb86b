//! Day and night variants of the sprite sheet

use super::canvas::Palette;
use super::color::{Color, invert_colors};

/// Decoded RGBA8 sprite sheet plus its color-inverted night twin
///
/// Backends build one when the artwork is loaded and upload
/// [`SpriteSheet::pixels`] for whichever palette [`Canvas::set_palette`]
/// binds.
///
/// [`Canvas::set_palette`]: super::Canvas::set_palette
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    width: u32,
    height: u32,
    day: Vec<u8>,
    night: Vec<u8>,
}

impl SpriteSheet {
    /// Derive the night sheet from `day`, keeping transparent pixels as they are
    ///
    /// # Panics
    ///
    /// Panics if `day` does not hold exactly `width * height` RGBA pixels.
    pub fn from_day(day: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            day.len(),
            width as usize * height as usize * 4,
            "sprite sheet is not {width}x{height} RGBA"
        );
        let night = invert_colors(&day, Some(Color::TRANSPARENT));
        Self {
            width,
            height,
            day,
            night,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self, palette: Palette) -> &[u8] {
        match palette {
            Palette::Day => &self.day,
            Palette::Night => &self.night,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_sheet_inverts_opaque_pixels() {
        let sheet = SpriteSheet::from_day(vec![83, 83, 83, 255, 0, 0, 0, 0], 2, 1);
        assert_eq!(sheet.size(), (2, 1));
        assert_eq!(sheet.pixels(Palette::Day), &[83, 83, 83, 255, 0, 0, 0, 0]);
        assert_eq!(
            sheet.pixels(Palette::Night),
            &[172, 172, 172, 255, 0, 0, 0, 0]
        );
    }

    #[test]
    #[should_panic(expected = "not 2x2 RGBA")]
    fn test_rejects_wrong_dimensions() {
        SpriteSheet::from_day(vec![0; 8], 2, 2);
    }
}
