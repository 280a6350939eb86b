//! Rendering seam
//!
//! Sprite-sheet blitting is delegated to whatever implements [`Canvas`].
//! The night palette is the day sheet with its colors inverted, see
//! [`SpriteSheet`].

pub mod canvas;
pub mod color;
pub mod sheet;

pub use canvas::{Canvas, DrawCommand, DrawList, Palette, Sprite};
pub use color::{Color, invert_colors};
pub use sheet::SpriteSheet;
