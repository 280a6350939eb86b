//! Drawing surface abstraction
//!
//! The simulation never talks to a graphics API directly. Entities describe
//! what to draw through [`Canvas`]; a backend (or [`DrawList`] in tests and
//! the headless runner) decides how.

use glam::Vec2;

use super::color::Color;
use crate::sim::Rect;

/// A source region on the sprite sheet
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Sprite {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Blit this region at `position` (top-left, window coordinates)
    pub fn draw(&self, canvas: &mut dyn Canvas, position: Vec2, tint: Color) {
        canvas.blit(*self, position, tint);
    }
}

/// Which sprite sheet variant is bound for the frame
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Palette {
    /// Original artwork
    #[default]
    Day,
    /// Color-inverted artwork
    Night,
}

/// Rendering surface consumed by the simulation's draw pass
pub trait Canvas {
    /// Fill the whole frame
    fn clear(&mut self, color: Color);
    /// Bind the day or night sprite sheet for subsequent blits
    fn set_palette(&mut self, palette: Palette);
    /// Uniform scale applied to everything drawn afterwards
    fn set_zoom(&mut self, zoom: f32);
    /// Copy a sprite sheet region to the frame
    fn blit(&mut self, sprite: Sprite, position: Vec2, tint: Color);
    /// Solid rectangle (alpha-blended)
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

/// A single recorded canvas call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Palette(Palette),
    Zoom(f32),
    Blit {
        sprite: Sprite,
        position: Vec2,
        tint: Color,
    },
    Fill {
        rect: Rect,
        color: Color,
    },
}

/// Canvas that records every call in order
#[derive(Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Recorded blits in draw order
    pub fn blits(&self) -> impl Iterator<Item = (Sprite, Vec2)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Blit {
                sprite, position, ..
            } => Some((*sprite, *position)),
            _ => None,
        })
    }

    /// Recorded rectangle fills in draw order
    pub fn fills(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Fill { rect, color } => Some((*rect, *color)),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn set_palette(&mut self, palette: Palette) {
        self.commands.push(DrawCommand::Palette(palette));
    }

    fn set_zoom(&mut self, zoom: f32) {
        self.commands.push(DrawCommand::Zoom(zoom));
    }

    fn blit(&mut self, sprite: Sprite, position: Vec2, tint: Color) {
        self.commands.push(DrawCommand::Blit {
            sprite,
            position,
            tint,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new();
        let sprite = Sprite::new(1, 2, 3, 4);
        list.clear(Color::WHITE);
        sprite.draw(&mut list, Vec2::new(5.0, 6.0), Color::WHITE);
        list.fill_rect(Rect::new(0, 0, 10, 10), Color::GRAY);

        assert_eq!(list.len(), 3);
        assert_eq!(list.commands[0], DrawCommand::Clear(Color::WHITE));
        assert_eq!(list.blits().collect::<Vec<_>>(), vec![(sprite, Vec2::new(5.0, 6.0))]);
        assert_eq!(list.fills().count(), 1);
    }
}
