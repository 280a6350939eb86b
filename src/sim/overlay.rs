//! "GAME OVER" banner with the restart button

use glam::Vec2;

use super::input::FrameInput;
use super::rect::Rect;
use crate::consts::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::renderer::{Canvas, Color, Sprite};

pub const OVERLAY_DRAW_ORDER: i32 = 100;

const TEXT_SPRITE_WIDTH: i32 = 192;
const TEXT_SPRITE_HEIGHT: i32 = 14;
const BUTTON_SPRITE_WIDTH: i32 = 36;
const BUTTON_SPRITE_HEIGHT: i32 = 32;

const TEXT_SPRITE: Sprite = Sprite::new(655, 14, TEXT_SPRITE_WIDTH, TEXT_SPRITE_HEIGHT);
const BUTTON_SPRITE: Sprite = Sprite::new(218, 68, BUTTON_SPRITE_WIDTH, BUTTON_SPRITE_HEIGHT);

#[derive(Debug, Clone)]
pub struct GameOverOverlay {
    position: Vec2,
    enabled: bool,
    previous_jump: bool,
}

impl Default for GameOverOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl GameOverOverlay {
    /// Disabled overlay centred in the window
    pub fn new() -> Self {
        Self {
            position: Vec2::new(
                (WINDOW_WIDTH / 2 - TEXT_SPRITE_WIDTH / 2) as f32,
                (WINDOW_HEIGHT / 2 - 30) as f32,
            ),
            enabled: false,
            previous_jump: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn button_position(&self) -> Vec2 {
        self.position
            + Vec2::new(
                (TEXT_SPRITE_WIDTH / 2 - BUTTON_SPRITE_WIDTH / 2) as f32,
                (TEXT_SPRITE_HEIGHT + 20) as f32,
            )
    }

    /// Clickable area in window pixels at the given zoom
    pub fn button_bounds(&self, zoom: f32) -> Rect {
        let origin = self.button_position() * zoom;
        Rect::new(
            origin.x as i32,
            origin.y as i32,
            (BUTTON_SPRITE_WIDTH as f32 * zoom) as i32,
            (BUTTON_SPRITE_HEIGHT as f32 * zoom) as i32,
        )
    }

    /// Returns true when the player asked to restart
    ///
    /// The jump key restarts on release, so the press that follows a death
    /// cannot restart by accident.
    pub fn update(&mut self, input: &FrameInput, zoom: f32) -> bool {
        if !self.enabled {
            return false;
        }

        let released = self.previous_jump && !input.jump;
        let clicked = input.pointer_pressed
            && input
                .pointer
                .is_some_and(|p| self.button_bounds(zoom).contains_point(p));

        self.previous_jump = input.jump;
        released || clicked
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.enabled {
            return;
        }
        TEXT_SPRITE.draw(canvas, self.position, Color::WHITE);
        BUTTON_SPRITE.draw(canvas, self.button_position(), Color::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;

    fn enabled() -> GameOverOverlay {
        let mut overlay = GameOverOverlay::new();
        overlay.set_enabled(true);
        overlay
    }

    fn jump(held: bool) -> FrameInput {
        FrameInput {
            jump: held,
            ..Default::default()
        }
    }

    #[test]
    fn test_layout() {
        let overlay = GameOverOverlay::new();
        assert_eq!(overlay.button_position(), Vec2::new(282.0, 104.0));
        assert_eq!(overlay.button_bounds(1.0), Rect::new(282, 104, 36, 32));
        assert_eq!(overlay.button_bounds(2.0), Rect::new(564, 208, 72, 64));
    }

    #[test]
    fn test_disabled_ignores_input() {
        let mut overlay = GameOverOverlay::new();
        assert!(!overlay.update(&jump(true), 1.0));
        assert!(!overlay.update(&jump(false), 1.0));
        assert!(!overlay.update(&FrameInput::clicked_at(Vec2::new(290.0, 110.0)), 1.0));
    }

    #[test]
    fn test_restart_on_jump_release() {
        let mut overlay = enabled();
        assert!(!overlay.update(&jump(true), 1.0));
        assert!(overlay.update(&jump(false), 1.0));
        assert!(!overlay.update(&jump(false), 1.0));
    }

    #[test]
    fn test_restart_on_click_inside_zoomed_button() {
        let mut overlay = enabled();
        assert!(!overlay.update(&FrameInput::clicked_at(Vec2::new(290.0, 110.0)), 2.0));
        assert!(overlay.update(&FrameInput::clicked_at(Vec2::new(580.0, 220.0)), 2.0));

        let hover = FrameInput {
            pointer: Some(Vec2::new(580.0, 220.0)),
            ..Default::default()
        };
        assert!(!overlay.update(&hover, 2.0));
    }

    #[test]
    fn test_draws_only_when_enabled() {
        let mut canvas = DrawList::new();
        GameOverOverlay::new().draw(&mut canvas);
        assert!(canvas.is_empty());
        enabled().draw(&mut canvas);
        assert_eq!(canvas.blits().count(), 2);
    }
}
