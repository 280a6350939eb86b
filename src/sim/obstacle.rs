//! Obstacles and their spawner
//!
//! Obstacles scroll toward the T-Rex and kill it on contact. The manager
//! decides when the next one appears: spawning unlocks at a small score,
//! then each obstacle rolls the score distance to the next one, widened as
//! the T-Rex speeds up.

use glam::Vec2;
use rand::Rng;

use super::actor::Actor;
use super::animation::SpriteAnimation;
use super::entity::{EntityId, Scene};
use super::rect::Rect;
use super::trex::{self, Trex, TrexSignal};
use crate::consts::{WINDOW_HEIGHT_ADJUSTMENT, WINDOW_WIDTH};
use crate::renderer::{Canvas, Color, Sprite};

/// Score before which nothing spawns
pub const MIN_SPAWN_SCORE: f64 = 10.0;
pub const MIN_OBSTACLE_DISTANCE: f64 = 8.0;
pub const MAX_OBSTACLE_DISTANCE: f64 = 28.0;
/// Extra distance added at max speed
pub const OBSTACLE_DISTANCE_SPEED_TOLERANCE: f64 = 5.0;
pub const PTERODACTYL_SPAWN_SCORE_MIN: i32 = 150;
pub const OBSTACLE_DESPAWN_POS_X: f32 = -200.0;

const CACTUS_GROUP_SPAWN_RATE: i32 = 75;
const PTERODACTYL_SPAWN_RATE: i32 = 25;

pub const DRAW_ORDER_TOP: i32 = 12;
pub const DRAW_ORDER_BOTTOM: i32 = 9;

const LARGE_CACTUS_POS_Y: f32 = (80 + WINDOW_HEIGHT_ADJUSTMENT) as f32;
const SMALL_CACTUS_POS_Y: f32 = (94 + WINDOW_HEIGHT_ADJUSTMENT) as f32;
const PTERODACTYL_POS_Y: [f32; 3] = [
    (90 + WINDOW_HEIGHT_ADJUSTMENT) as f32,
    (62 + WINDOW_HEIGHT_ADJUSTMENT) as f32,
    (24 + WINDOW_HEIGHT_ADJUSTMENT) as f32,
];

const CACTUS_COLLISION_INSET: i32 = 3;
const SMALL_CACTUS_SPRITE_X: i32 = 228;
const SMALL_CACTUS_WIDTH: i32 = 17;
const SMALL_CACTUS_HEIGHT: i32 = 36;
const LARGE_CACTUS_SPRITE_X: i32 = 332;
const LARGE_CACTUS_WIDTH: i32 = 25;
const LARGE_CACTUS_HEIGHT: i32 = 51;

const PTERODACTYL_SPRITE_X: i32 = 134;
const PTERODACTYL_WIDTH: i32 = 46;
const PTERODACTYL_HEIGHT: i32 = 42;
const PTERODACTYL_FRAME_LENGTH: f32 = 0.2;
const PTERODACTYL_HORIZONTAL_INSET: i32 = 6;
const PTERODACTYL_VERTICAL_INSET: i32 = 10;
/// Own flying speed on top of the scroll speed
pub const PTERODACTYL_SPEED: f32 = 80.0;

/// Number of cacti in a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSize {
    Small,
    Medium,
    Large,
}

impl GroupSize {
    pub const ALL: [GroupSize; 3] = [GroupSize::Small, GroupSize::Medium, GroupSize::Large];

    fn count(self) -> i32 {
        match self {
            GroupSize::Small => 1,
            GroupSize::Medium => 2,
            GroupSize::Large => 3,
        }
    }
}

#[derive(Debug, Clone)]
enum Shape {
    CactusGroup {
        large: bool,
        size: GroupSize,
        sprite: Sprite,
    },
    Pterodactyl {
        animation: SpriteAnimation,
    },
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    shape: Shape,
    position: Vec2,
    draw_order: i32,
}

impl Obstacle {
    pub fn cactus_group(large: bool, size: GroupSize, position: Vec2, draw_order: i32) -> Self {
        // Groups are laid out side by side on the sheet: 1, 2, then 3 cacti
        let (base_x, width, height) = if large {
            (LARGE_CACTUS_SPRITE_X, LARGE_CACTUS_WIDTH, LARGE_CACTUS_HEIGHT)
        } else {
            (SMALL_CACTUS_SPRITE_X, SMALL_CACTUS_WIDTH, SMALL_CACTUS_HEIGHT)
        };
        let n = size.count();
        let offset = width * (n - 1) * n / 2;
        let sprite = Sprite::new(base_x + offset, 0, width * n, height);
        Self {
            shape: Shape::CactusGroup { large, size, sprite },
            position,
            draw_order,
        }
    }

    pub fn pterodactyl(position: Vec2, draw_order: i32) -> Self {
        let a = Sprite::new(PTERODACTYL_SPRITE_X, 0, PTERODACTYL_WIDTH, PTERODACTYL_HEIGHT);
        let b = Sprite::new(
            PTERODACTYL_SPRITE_X + PTERODACTYL_WIDTH,
            0,
            PTERODACTYL_WIDTH,
            PTERODACTYL_HEIGHT,
        );
        Self {
            shape: Shape::Pterodactyl {
                animation: SpriteAnimation::looping(&[
                    (a, 0.0),
                    (b, PTERODACTYL_FRAME_LENGTH),
                    (a, PTERODACTYL_FRAME_LENGTH * 2.0),
                ]),
            },
            position,
            draw_order,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn draw_order(&self) -> i32 {
        self.draw_order
    }

    pub fn is_pterodactyl(&self) -> bool {
        matches!(self.shape, Shape::Pterodactyl { .. })
    }

    /// `(large, size)` for cactus groups
    pub fn cactus(&self) -> Option<(bool, GroupSize)> {
        match self.shape {
            Shape::CactusGroup { large, size, .. } => Some((large, size)),
            Shape::Pterodactyl { .. } => None,
        }
    }

    pub fn collision_box(&self) -> Rect {
        match &self.shape {
            Shape::CactusGroup { sprite, .. } => Rect::at(self.position, sprite.width, sprite.height)
                .inflate(-CACTUS_COLLISION_INSET, -CACTUS_COLLISION_INSET),
            Shape::Pterodactyl { .. } => {
                Rect::at(self.position, PTERODACTYL_WIDTH, PTERODACTYL_HEIGHT)
                    .inflate(-PTERODACTYL_HORIZONTAL_INSET, -PTERODACTYL_VERTICAL_INSET)
            }
        }
    }

    /// Scroll, then kill the T-Rex on overlap
    pub fn update(&mut self, trex: &mut Trex, dt: f32) -> Option<TrexSignal> {
        self.position.x -= trex.speed() * dt;

        let signal = if self.collision_box().intersects(&trex.collision_box()) {
            trex.die()
        } else {
            None
        };

        if let Shape::Pterodactyl { animation } = &mut self.shape {
            if trex.is_alive() {
                self.position.x -= PTERODACTYL_SPEED * dt;
                animation.update(dt);
            }
        }

        signal
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        match &self.shape {
            Shape::CactusGroup { sprite, .. } => sprite.draw(canvas, self.position, Color::WHITE),
            Shape::Pterodactyl { animation } => animation.draw(canvas, self.position, Color::WHITE),
        }
    }
}

/// Spawns obstacles at randomized score distances
#[derive(Debug, Clone)]
pub struct ObstacleManager {
    enabled: bool,
    /// Score at the last spawn, -1 if nothing spawned yet
    last_spawn_score: f64,
    /// Score distance between the last obstacle and the next
    target_distance: f64,
}

impl Default for ObstacleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleManager {
    pub fn new() -> Self {
        Self {
            enabled: false,
            last_spawn_score: -1.0,
            target_distance: 0.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn last_spawn_score(&self) -> f64 {
        self.last_spawn_score
    }

    pub fn target_distance(&self) -> f64 {
        self.target_distance
    }

    pub fn can_spawn(&self, score: i32) -> bool {
        self.enabled && score as f64 >= MIN_SPAWN_SCORE
    }

    pub fn update(
        &mut self,
        scene: &mut Scene<'_, Actor>,
        trex: &Trex,
        score: i32,
        rng: &mut impl Rng,
    ) {
        if !self.enabled {
            return;
        }

        let score_f = score as f64;
        if self.can_spawn(score)
            && (self.last_spawn_score <= 0.0
                || score_f - self.last_spawn_score >= self.target_distance)
        {
            let speed_factor = ((trex.speed() - trex::START_SPEED)
                / (trex::MAX_SPEED - trex::START_SPEED)) as f64;
            self.target_distance = rng.random::<f64>()
                * (MAX_OBSTACLE_DISTANCE - MIN_OBSTACLE_DISTANCE)
                + MIN_OBSTACLE_DISTANCE
                + speed_factor * OBSTACLE_DISTANCE_SPEED_TOLERANCE;
            self.last_spawn_score = score_f;
            scene.add(Actor::Obstacle(spawn_random_obstacle(score, rng)));
        }

        let gone: Vec<EntityId> = scene
            .iter()
            .filter_map(|(id, actor)| actor.as_obstacle().map(|o| (id, o)))
            .filter(|(_, o)| o.position().x < OBSTACLE_DESPAWN_POS_X)
            .map(|(id, _)| id)
            .collect();
        for id in gone {
            scene.remove(id);
        }
    }

    /// Drop every obstacle (live or queued) and forget the spawn cursor
    pub fn reset(&mut self, scene: &mut Scene<'_, Actor>) {
        let ids: Vec<EntityId> = scene
            .iter()
            .chain(scene.pending())
            .filter(|(_, actor)| actor.as_obstacle().is_some())
            .map(|(id, _)| id)
            .collect();
        for id in ids {
            scene.remove(id);
        }
        self.target_distance = 0.0;
        self.last_spawn_score = -1.0;
    }
}

fn spawn_random_obstacle(score: i32, rng: &mut impl Rng) -> Obstacle {
    let pterodactyl_rate = if score >= PTERODACTYL_SPAWN_SCORE_MIN {
        PTERODACTYL_SPAWN_RATE
    } else {
        0
    };
    let roll = rng.random_range(0..=CACTUS_GROUP_SPAWN_RATE + pterodactyl_rate);
    let on_top = rng.random::<f64>() > 0.5;
    let draw_order = if on_top {
        DRAW_ORDER_TOP
    } else {
        DRAW_ORDER_BOTTOM
    };
    let x = WINDOW_WIDTH as f32;

    if roll <= CACTUS_GROUP_SPAWN_RATE {
        let size = GroupSize::ALL[rng.random_range(0..GroupSize::ALL.len())];
        let large = rng.random::<f64>() > 0.5;
        let y = if large {
            LARGE_CACTUS_POS_Y
        } else {
            SMALL_CACTUS_POS_Y
        };
        Obstacle::cactus_group(large, size, Vec2::new(x, y), draw_order)
    } else {
        let y = PTERODACTYL_POS_Y[rng.random_range(0..PTERODACTYL_POS_Y.len())];
        Obstacle::pterodactyl(Vec2::new(x, y), draw_order)
    }
}
