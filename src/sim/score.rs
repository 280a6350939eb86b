//! Score counter and display

use glam::Vec2;

use crate::renderer::{Canvas, Color, Sprite};

/// Score gained per pixel the T-Rex runs
pub const SCORE_INCREMENT_MULTIPLIER: f64 = 0.025;
pub const MAX_SCORE: f64 = 99_999.0;
/// Score interval that triggers the milestone flash and sound
pub const MILESTONE_INTERVAL: i32 = 100;

const FLASH_DELAY: f32 = 0.333;
const FLASH_TOGGLES: i32 = 4;

const DIGIT_SPRITE_X: i32 = 655;
const DIGIT_SPRITE_WIDTH: i32 = 10;
const DIGIT_SPRITE_HEIGHT: i32 = 13;
const DIGIT_COUNT: u32 = 5;
/// "H" and "I" sit right after the ten digits on the sheet
const HI_GLYPHS: [i32; 2] = [10, 11];

const HIGH_SCORE_MARGIN: f32 = 70.0;
const HI_TEXT_MARGIN: f32 = 28.0;

#[derive(Debug, Clone)]
pub struct ScoreBoard {
    position: Vec2,
    score: f64,
    high_score: i32,
    /// Last milestone already celebrated
    last_milestone: i32,
    /// Seconds into the milestone flash, if one is playing
    flash_time: Option<f32>,
}

impl ScoreBoard {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            score: 0.0,
            high_score: 0,
            last_milestone: 0,
            flash_time: None,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn display_score(&self) -> i32 {
        self.score.floor() as i32
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = score.clamp(0.0, MAX_SCORE);
        self.last_milestone = milestone_of(self.display_score());
        self.flash_time = None;
    }

    pub fn high_score(&self) -> i32 {
        self.high_score
    }

    pub fn set_high_score(&mut self, high_score: i32) {
        self.high_score = high_score.max(0);
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_time.is_some()
    }

    /// Advance by distance run; returns true when a new milestone was reached
    pub fn update(&mut self, speed: f32, alive: bool, dt: f32) -> bool {
        if let Some(t) = self.flash_time.as_mut() {
            *t += dt;
            if *t >= FLASH_DELAY * FLASH_TOGGLES as f32 {
                self.flash_time = None;
            }
        }

        if !alive {
            return false;
        }

        self.score =
            (self.score + speed as f64 * SCORE_INCREMENT_MULTIPLIER * dt as f64).clamp(0.0, MAX_SCORE);

        let milestone = milestone_of(self.display_score());
        if milestone != 0 && milestone != self.last_milestone {
            self.last_milestone = milestone;
            self.flash_time = Some(0.0);
            return true;
        }
        false
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if self.high_score > 0 {
            let hi_x = self.position.x - HIGH_SCORE_MARGIN - HI_TEXT_MARGIN;
            for (i, glyph) in HI_GLYPHS.into_iter().enumerate() {
                let pos = Vec2::new(hi_x + (i as i32 * DIGIT_SPRITE_WIDTH) as f32, self.position.y);
                digit_sprite(glyph).draw(canvas, pos, Color::WHITE);
            }
            draw_number(
                canvas,
                self.high_score,
                Vec2::new(self.position.x - HIGH_SCORE_MARGIN, self.position.y),
            );
        }

        match self.flash_time {
            Some(t) => {
                // Blink the milestone value instead of the running score
                if (t / FLASH_DELAY) as i32 % 2 == 0 {
                    draw_number(canvas, self.last_milestone, self.position);
                }
            }
            None => draw_number(canvas, self.display_score(), self.position),
        }
    }
}

fn milestone_of(score: i32) -> i32 {
    score / MILESTONE_INTERVAL * MILESTONE_INTERVAL
}

fn digit_sprite(index: i32) -> Sprite {
    Sprite::new(
        DIGIT_SPRITE_X + index * DIGIT_SPRITE_WIDTH,
        0,
        DIGIT_SPRITE_WIDTH,
        DIGIT_SPRITE_HEIGHT,
    )
}

/// Five zero-padded digits, most significant first
fn draw_number(canvas: &mut dyn Canvas, value: i32, position: Vec2) {
    let value = value.max(0);
    for i in 0..DIGIT_COUNT {
        let digit = value / 10_i32.pow(DIGIT_COUNT - 1 - i) % 10;
        let pos = Vec2::new(position.x + (i as i32 * DIGIT_SPRITE_WIDTH) as f32, position.y);
        digit_sprite(digit).draw(canvas, pos, Color::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;

    fn board() -> ScoreBoard {
        ScoreBoard::new(Vec2::new(470.0, 10.0))
    }

    fn digits(canvas: &DrawList) -> Vec<i32> {
        canvas
            .blits()
            .map(|(s, _)| (s.x - DIGIT_SPRITE_X) / DIGIT_SPRITE_WIDTH)
            .collect()
    }

    #[test]
    fn test_score_advances_with_speed() {
        let mut score = board();
        score.update(280.0, true, 1.0);
        assert!((score.score() - 7.0).abs() < 1e-9);
        assert_eq!(score.display_score(), 7);
    }

    #[test]
    fn test_dead_trex_scores_nothing() {
        let mut score = board();
        score.update(280.0, false, 10.0);
        assert_eq!(score.score(), 0.0);
    }

    #[test]
    fn test_score_clamped_to_max() {
        let mut score = board();
        score.set_score(99_998.0);
        score.update(900.0, true, 10.0);
        assert_eq!(score.display_score(), 99_999);
    }

    #[test]
    fn test_milestone_fires_once_per_hundred() {
        let mut score = board();
        score.set_score(99.9);
        assert!(score.update(100.0, true, 0.1));
        assert!(score.is_flashing());
        assert!(!score.update(100.0, true, 0.1));

        score.set_score(150.0);
        assert!(!score.update(100.0, true, 0.1));
    }

    #[test]
    fn test_reset_to_zero_does_not_celebrate() {
        let mut score = board();
        score.set_score(250.0);
        score.set_score(0.0);
        assert!(!score.update(10.0, true, 0.01));
        assert!(!score.is_flashing());
    }

    #[test]
    fn test_flash_ends_after_four_toggles() {
        let mut score = board();
        score.set_score(99.99);
        score.update(100.0, true, 0.01);
        for _ in 0..14 {
            score.update(0.0, true, 0.1);
        }
        assert!(!score.is_flashing());
    }

    #[test]
    fn test_flash_shows_milestone_then_blanks() {
        let mut score = board();
        score.set_score(99.99);
        score.update(100.0, true, 0.1);
        score.update(0.0, true, 0.0);

        let mut canvas = DrawList::new();
        score.draw(&mut canvas);
        assert_eq!(digits(&canvas), vec![0, 0, 1, 0, 0]);

        score.update(0.0, true, 0.4);
        let mut canvas = DrawList::new();
        score.draw(&mut canvas);
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_draw_with_high_score() {
        let mut score = board();
        score.set_score(42.5);
        score.set_high_score(1234);
        let mut canvas = DrawList::new();
        score.draw(&mut canvas);
        assert_eq!(
            digits(&canvas),
            vec![10, 11, 0, 1, 2, 3, 4, 0, 0, 0, 4, 2]
        );
    }
}
