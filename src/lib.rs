//! T-Rex Runner - a side-scrolling reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity scheduling, physics, spawning, day/night)
//! - `renderer`: Canvas seam and palette helpers
//! - `audio`: Sound cue mixing
//! - `persistence`: High score save file
//! - `settings`: Player preferences and render configuration
//! - `game`: Frame loop tying the simulation to the runtime seams

pub mod audio;
pub mod game;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Flow, Game};
pub use settings::{DisplayMode, RenderConfig, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Max simulation steps per rendered frame (prevents spiral of death)
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Wall time beyond this is dropped after a stall (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Window dimensions (logical pixels, before zoom)
    pub const WINDOW_HEIGHT_ADJUSTMENT: i32 = 50;
    pub const WINDOW_WIDTH: i32 = 600;
    pub const WINDOW_HEIGHT: i32 = 150 + WINDOW_HEIGHT_ADJUSTMENT;
    pub const WINDOW_MARGIN_BOTTOM: i32 = 16;

    /// Zoomed display mode scale
    pub const DISPLAY_ZOOM_FACTOR: f32 = 2.0;

    /// T-Rex sprite footprint
    pub const TREX_SPRITE_WIDTH: i32 = 44;
    pub const TREX_SPRITE_HEIGHT: i32 = 50;

    /// T-Rex resting position (feet on the ground line)
    pub const TREX_START_X: f32 = 1.0;
    pub const TREX_START_Y: f32 =
        (WINDOW_HEIGHT - WINDOW_MARGIN_BOTTOM - TREX_SPRITE_HEIGHT) as f32;
    pub const TREX_DRAW_ORDER: i32 = 10;

    /// Score board anchor
    pub const SCORE_BOARD_X: f32 = (WINDOW_WIDTH - 130) as f32;
    pub const SCORE_BOARD_Y: f32 = 10.0;

    /// Fade-in curtain speed during the intro jump (pixels/s)
    pub const FADE_IN_SPEED: f32 = 820.0;
}
