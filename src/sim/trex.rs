//! The player character: jump physics and animation state machine

use glam::Vec2;
use rand::Rng;

use super::animation::SpriteAnimation;
use super::rect::Rect;
use crate::consts::{TREX_SPRITE_HEIGHT, TREX_SPRITE_WIDTH};
use crate::renderer::{Canvas, Color, Sprite};

/// Downward acceleration while airborne (pixels/s²)
pub const GRAVITY: f32 = 1600.0;
/// Initial vertical velocity of a jump (negative is up)
pub const JUMP_START_VELOCITY: f32 = -580.0;
/// Velocity a released jump is clamped to
pub const CANCEL_JUMP_VELOCITY: f32 = -100.0;
/// A jump can only be cut short after rising this far
pub const MIN_JUMP_HEIGHT: f32 = 40.0;
/// One-frame fast-fall boost
pub const DROP_VELOCITY: f32 = 600.0;

pub const START_SPEED: f32 = 280.0;
pub const MAX_SPEED: f32 = 900.0;
/// Speed gained per second while running
pub const ACCELERATION_PPS_PER_SECOND: f32 = 3.0;

const COLLISION_BOX_INSET: i32 = 3;
const DUCK_COLLISION_REDUCTION: i32 = 20;

const RUN_ANIMATION_FRAME_LENGTH: f32 = 0.1;
const BLINK_ANIMATION_RANDOM_MIN: f32 = 2.0;
const BLINK_ANIMATION_RANDOM_MAX: f32 = 10.0;
const BLINK_ANIMATION_EYE_CLOSE_TIME: f32 = 0.5;

const DUCKING_SPRITE_WIDTH: i32 = 59;
const DEFAULT_SPRITE_X: i32 = 848;

const IDLE_BACKGROUND_SPRITE: Sprite = Sprite::new(40, 0, TREX_SPRITE_WIDTH, TREX_SPRITE_HEIGHT);
const IDLE_SPRITE: Sprite = Sprite::new(DEFAULT_SPRITE_X, 0, TREX_SPRITE_WIDTH, TREX_SPRITE_HEIGHT);
const IDLE_BLINK_SPRITE: Sprite = Sprite::new(
    DEFAULT_SPRITE_X + TREX_SPRITE_WIDTH,
    0,
    TREX_SPRITE_WIDTH,
    TREX_SPRITE_HEIGHT,
);
const RUN_SPRITE_X: i32 = DEFAULT_SPRITE_X + TREX_SPRITE_WIDTH * 2;
const DUCK_SPRITE_X: i32 = DEFAULT_SPRITE_X + TREX_SPRITE_WIDTH * 6;
const DEAD_SPRITE: Sprite = Sprite::new(1068, 0, TREX_SPRITE_WIDTH, TREX_SPRITE_HEIGHT);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrexState {
    /// Standing still; also the resting pose once dead
    Idle,
    Running,
    /// Rising
    Jumping,
    /// Descending (or fast-falling after a drop)
    Falling,
    Ducking,
}

/// Notifications raised by the T-Rex, handled by the caller in the same pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrexSignal {
    /// Landed back on the ground line
    JumpComplete,
    /// Hit an obstacle
    Died,
}

#[derive(Debug, Clone)]
pub struct Trex {
    state: TrexState,
    position: Vec2,
    start_y: f32,
    vertical_velocity: f32,
    drop_velocity: f32,
    speed: f32,
    alive: bool,
    blink_animation: SpriteAnimation,
    run_animation: SpriteAnimation,
    duck_animation: SpriteAnimation,
}

impl Trex {
    /// A resting T-Rex at `position`, which also becomes its ground line
    pub fn new(position: Vec2, rng: &mut impl Rng) -> Self {
        let run_a = Sprite::new(RUN_SPRITE_X, 0, TREX_SPRITE_WIDTH, TREX_SPRITE_HEIGHT);
        let run_b = Sprite::new(
            RUN_SPRITE_X + TREX_SPRITE_WIDTH,
            0,
            TREX_SPRITE_WIDTH,
            TREX_SPRITE_HEIGHT,
        );
        let duck_a = Sprite::new(DUCK_SPRITE_X, 0, DUCKING_SPRITE_WIDTH, TREX_SPRITE_HEIGHT);
        let duck_b = Sprite::new(
            DUCK_SPRITE_X + DUCKING_SPRITE_WIDTH,
            0,
            DUCKING_SPRITE_WIDTH,
            TREX_SPRITE_HEIGHT,
        );

        let mut trex = Self {
            state: TrexState::Idle,
            position,
            start_y: position.y,
            vertical_velocity: 0.0,
            drop_velocity: 0.0,
            speed: 0.0,
            alive: true,
            blink_animation: SpriteAnimation::new(),
            run_animation: SpriteAnimation::looping(&[
                (run_a, 0.0),
                (run_b, RUN_ANIMATION_FRAME_LENGTH),
                (run_a, RUN_ANIMATION_FRAME_LENGTH * 2.0),
            ]),
            duck_animation: SpriteAnimation::looping(&[
                (duck_a, 0.0),
                (duck_b, RUN_ANIMATION_FRAME_LENGTH),
                (duck_a, RUN_ANIMATION_FRAME_LENGTH * 2.0),
            ]),
        };
        trex.create_blink_animation(rng);
        trex
    }

    pub fn state(&self) -> TrexState {
        self.state
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self.state, TrexState::Jumping | TrexState::Falling)
    }

    /// Reset for a new run: running at start speed on the ground line
    pub fn initialize(&mut self) {
        self.speed = START_SPEED;
        self.state = TrexState::Running;
        self.alive = true;
        self.vertical_velocity = 0.0;
        self.drop_velocity = 0.0;
        self.position.y = self.start_y;
    }

    pub fn begin_jump(&mut self) -> bool {
        if self.is_airborne() {
            return false;
        }
        self.state = TrexState::Jumping;
        self.vertical_velocity = JUMP_START_VELOCITY;
        true
    }

    /// Cut a jump short once it has risen at least [`MIN_JUMP_HEIGHT`]
    pub fn cancel_jump(&mut self) -> bool {
        if self.state != TrexState::Jumping || self.start_y - self.position.y < MIN_JUMP_HEIGHT {
            return false;
        }
        self.vertical_velocity = if self.vertical_velocity < CANCEL_JUMP_VELOCITY {
            CANCEL_JUMP_VELOCITY
        } else {
            0.0
        };
        true
    }

    pub fn drop(&mut self) -> bool {
        if !self.is_airborne() {
            return false;
        }
        self.state = TrexState::Falling;
        self.drop_velocity = DROP_VELOCITY;
        true
    }

    pub fn duck(&mut self) -> bool {
        if self.is_airborne() {
            return false;
        }
        self.state = TrexState::Ducking;
        true
    }

    pub fn get_up(&mut self) -> bool {
        if self.state != TrexState::Ducking {
            return false;
        }
        self.state = TrexState::Running;
        true
    }

    /// Kill the T-Rex; only the first call has any effect
    pub fn die(&mut self) -> Option<TrexSignal> {
        if !self.alive {
            return None;
        }
        self.state = TrexState::Idle;
        self.speed = 0.0;
        self.alive = false;
        Some(TrexSignal::Died)
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) -> Option<TrexSignal> {
        let mut signal = None;

        match self.state {
            TrexState::Idle => {
                if !self.blink_animation.is_playing() {
                    self.create_blink_animation(rng);
                }
                self.blink_animation.update(dt);
            }
            TrexState::Jumping | TrexState::Falling => {
                self.position.y += (self.vertical_velocity + self.drop_velocity) * dt;
                self.vertical_velocity += GRAVITY * dt;

                if self.vertical_velocity >= 0.0 {
                    self.state = TrexState::Falling;
                }

                if self.position.y >= self.start_y {
                    self.position.y = self.start_y;
                    self.vertical_velocity = 0.0;
                    self.state = TrexState::Running;
                    signal = Some(TrexSignal::JumpComplete);
                }
            }
            TrexState::Running => self.run_animation.update(dt),
            TrexState::Ducking => self.duck_animation.update(dt),
        }

        if self.state != TrexState::Idle {
            self.speed += ACCELERATION_PPS_PER_SECOND * dt;
        }
        self.speed = self.speed.min(MAX_SPEED);
        self.drop_velocity = 0.0;

        signal
    }

    /// Sprite bounds inset by a small margin; ducking lowers the top edge
    pub fn collision_box(&self) -> Rect {
        let mut rect = Rect::at(self.position, TREX_SPRITE_WIDTH, TREX_SPRITE_HEIGHT)
            .inflate(-COLLISION_BOX_INSET, -COLLISION_BOX_INSET);
        if self.state == TrexState::Ducking {
            rect.y += DUCK_COLLISION_REDUCTION;
            rect.height -= DUCK_COLLISION_REDUCTION;
        }
        rect
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, tint: Color) {
        if !self.alive {
            DEAD_SPRITE.draw(canvas, self.position, tint);
            return;
        }
        match self.state {
            TrexState::Idle => {
                IDLE_BACKGROUND_SPRITE.draw(canvas, self.position, tint);
                self.blink_animation.draw(canvas, self.position, tint);
            }
            TrexState::Jumping | TrexState::Falling => IDLE_SPRITE.draw(canvas, self.position, tint),
            TrexState::Running => self.run_animation.draw(canvas, self.position, tint),
            TrexState::Ducking => self.duck_animation.draw(canvas, self.position, tint),
        }
    }

    /// Eyes open, then a short blink after a random delay
    fn create_blink_animation(&mut self, rng: &mut impl Rng) {
        let blink_at = rng.random_range(BLINK_ANIMATION_RANDOM_MIN..BLINK_ANIMATION_RANDOM_MAX);
        self.blink_animation = SpriteAnimation::once(&[
            (IDLE_SPRITE, 0.0),
            (IDLE_BLINK_SPRITE, blink_at),
            (IDLE_SPRITE, blink_at + BLINK_ANIMATION_EYE_CLOSE_TIME),
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SIM_DT, TREX_START_X, TREX_START_Y};
    use crate::renderer::DrawList;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running_trex(rng: &mut Pcg32) -> Trex {
        let mut trex = Trex::new(Vec2::new(TREX_START_X, TREX_START_Y), rng);
        trex.initialize();
        trex
    }

    /// Step until the jump lands, returning the number of frames taken
    fn land(trex: &mut Trex, rng: &mut Pcg32) -> usize {
        for frame in 1..=600 {
            if trex.update(SIM_DT, rng) == Some(TrexSignal::JumpComplete) {
                return frame;
            }
        }
        panic!("jump never completed");
    }

    #[test]
    fn test_new_trex_is_idle_and_still() {
        let mut rng = Pcg32::seed_from_u64(1);
        let trex = Trex::new(Vec2::new(TREX_START_X, TREX_START_Y), &mut rng);
        assert_eq!(trex.state(), TrexState::Idle);
        assert_eq!(trex.speed(), 0.0);
        assert!(trex.is_alive());
    }

    #[test]
    fn test_initialize_starts_running() {
        let mut rng = Pcg32::seed_from_u64(1);
        let trex = running_trex(&mut rng);
        assert_eq!(trex.state(), TrexState::Running);
        assert_eq!(trex.speed(), START_SPEED);
    }

    #[test]
    fn test_full_jump_lands_on_ground_line() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut trex = running_trex(&mut rng);
        assert!(trex.begin_jump());
        assert!(!trex.begin_jump(), "no double jump");

        let frames = land(&mut trex, &mut rng);
        // ~2 * 580 / 1600 seconds of flight at 60 Hz
        assert!((40..=46).contains(&frames), "landed after {frames} frames");
        assert_eq!(trex.state(), TrexState::Running);
        assert_eq!(trex.position().y, TREX_START_Y);
        assert_eq!(trex.vertical_velocity(), 0.0);
    }

    #[test]
    fn test_becomes_falling_at_apex() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut trex = running_trex(&mut rng);
        trex.begin_jump();
        while trex.vertical_velocity() < 0.0 {
            assert_eq!(trex.state(), TrexState::Jumping);
            trex.update(SIM_DT, &mut rng);
        }
        assert_eq!(trex.state(), TrexState::Falling);
    }

    #[test]
    fn test_cancel_before_min_height_is_noop() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut trex = running_trex(&mut rng);
        trex.begin_jump();
        trex.update(SIM_DT, &mut rng);
        let velocity = trex.vertical_velocity();

        assert!(!trex.cancel_jump());
        assert_eq!(trex.state(), TrexState::Jumping);
        assert_eq!(trex.vertical_velocity(), velocity);
    }

    #[test]
    fn test_cancel_after_min_height_clamps_velocity() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut trex = running_trex(&mut rng);
        trex.begin_jump();
        while TREX_START_Y - trex.position().y < MIN_JUMP_HEIGHT {
            trex.update(SIM_DT, &mut rng);
        }
        assert!(trex.cancel_jump());
        assert_eq!(trex.vertical_velocity(), CANCEL_JUMP_VELOCITY);
    }

    #[test]
    fn test_drop_only_while_airborne() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut trex = running_trex(&mut rng);
        assert!(!trex.drop());

        trex.begin_jump();
        trex.update(SIM_DT, &mut rng);
        assert!(trex.drop());
        assert_eq!(trex.state(), TrexState::Falling);

        let before = trex.position().y;
        let velocity = trex.vertical_velocity();
        trex.update(SIM_DT, &mut rng);
        let moved = trex.position().y - before;
        assert!((moved - (velocity + DROP_VELOCITY) * SIM_DT).abs() < 1e-3);

        // The boost lasts a single frame
        let before = trex.position().y;
        let velocity = trex.vertical_velocity();
        trex.update(SIM_DT, &mut rng);
        let moved = trex.position().y - before;
        assert!((moved - velocity * SIM_DT).abs() < 1e-3);
    }

    #[test]
    fn test_duck_and_get_up() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut trex = running_trex(&mut rng);
        assert!(!trex.get_up());
        assert!(trex.duck());
        assert_eq!(trex.state(), TrexState::Ducking);
        assert!(trex.get_up());
        assert_eq!(trex.state(), TrexState::Running);

        trex.begin_jump();
        assert!(!trex.duck());
    }

    #[test]
    fn test_die_is_once() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut trex = running_trex(&mut rng);
        assert_eq!(trex.die(), Some(TrexSignal::Died));
        assert_eq!(trex.die(), None);
        assert_eq!(trex.state(), TrexState::Idle);
        assert_eq!(trex.speed(), 0.0);

        // Idle does not accelerate
        trex.update(1.0, &mut rng);
        assert_eq!(trex.speed(), 0.0);
    }

    #[test]
    fn test_collision_box_shrinks_when_ducking() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut trex = running_trex(&mut rng);
        let standing = trex.collision_box();
        assert_eq!(standing, Rect::new(4, 137, 38, 44));

        trex.duck();
        let ducking = trex.collision_box();
        assert_eq!(ducking.top(), standing.top() + 20);
        assert_eq!(ducking.bottom(), standing.bottom());
    }

    #[test]
    fn test_draw_dead_sprite() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut trex = running_trex(&mut rng);
        trex.die();
        let mut canvas = DrawList::new();
        trex.draw(&mut canvas, Color::WHITE);
        let sprites: Vec<Sprite> = canvas.blits().map(|(s, _)| s).collect();
        assert_eq!(sprites, vec![DEAD_SPRITE]);
    }

    #[test]
    fn test_idle_draws_background_and_blink() {
        let mut rng = Pcg32::seed_from_u64(11);
        let trex = Trex::new(Vec2::new(TREX_START_X, TREX_START_Y), &mut rng);
        let mut canvas = DrawList::new();
        trex.draw(&mut canvas, Color::WHITE);
        let sprites: Vec<Sprite> = canvas.blits().map(|(s, _)| s).collect();
        assert_eq!(sprites, vec![IDLE_BACKGROUND_SPRITE, IDLE_SPRITE]);
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_max(
            seed in any::<u64>(),
            steps in prop::collection::vec(0.0f32..5.0, 1..200),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut trex = running_trex(&mut rng);
            for (i, dt) in steps.into_iter().enumerate() {
                if i % 7 == 0 {
                    trex.begin_jump();
                }
                trex.update(dt, &mut rng);
                prop_assert!(trex.speed() <= MAX_SPEED);
            }
        }
    }
}
