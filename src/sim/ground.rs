//! Scrolling ground strip

use glam::Vec2;
use rand::Rng;

use super::actor::Actor;
use super::entity::{EntityId, Scene};
use crate::consts::WINDOW_HEIGHT_ADJUSTMENT;
use crate::renderer::{Canvas, Color, Sprite};

pub const GROUND_TILE_POS_Y: f32 = (121 + WINDOW_HEIGHT_ADJUSTMENT) as f32;
pub const TILE_WIDTH: i32 = 600;
const TILE_HEIGHT: i32 = 14;

const REGULAR_SPRITE: Sprite = Sprite::new(2, 54, TILE_WIDTH, TILE_HEIGHT);
const BUMPY_SPRITE: Sprite = Sprite::new(2 + TILE_WIDTH, 54, TILE_WIDTH, TILE_HEIGHT);

#[derive(Debug, Clone)]
pub struct GroundTile {
    position: Vec2,
    sprite: Sprite,
}

impl GroundTile {
    pub fn regular(x: f32) -> Self {
        Self {
            position: Vec2::new(x, GROUND_TILE_POS_Y),
            sprite: REGULAR_SPRITE,
        }
    }

    pub fn bumpy(x: f32) -> Self {
        Self {
            position: Vec2::new(x, GROUND_TILE_POS_Y),
            sprite: BUMPY_SPRITE,
        }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn is_bumpy(&self) -> bool {
        self.sprite == BUMPY_SPRITE
    }

    pub fn scroll(&mut self, dx: f32) {
        self.position.x -= dx;
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.sprite.draw(canvas, self.position, Color::WHITE);
    }
}

/// Keeps the screen covered with ground tiles
#[derive(Debug, Clone, Default)]
pub struct GroundManager;

impl GroundManager {
    pub fn new() -> Self {
        Self
    }

    /// Replace every tile (live or queued) with one regular tile at x 0
    pub fn initialize(&mut self, scene: &mut Scene<'_, Actor>) {
        let ids: Vec<EntityId> = scene
            .iter()
            .chain(scene.pending())
            .filter(|(_, actor)| actor.as_ground_tile().is_some())
            .map(|(id, _)| id)
            .collect();
        for id in ids {
            scene.remove(id);
        }
        scene.add(Actor::GroundTile(GroundTile::regular(0.0)));
    }

    pub fn update(&mut self, scene: &mut Scene<'_, Actor>, speed: f32, dt: f32, rng: &mut impl Rng) {
        // All tiles scroll together, before any obstacle can stop the trex
        let mut tiles: Vec<(EntityId, f32)> = Vec::new();
        for (id, actor) in scene.iter_mut() {
            if let Actor::GroundTile(tile) = actor {
                tile.scroll(speed * dt);
                tiles.push((id, tile.x()));
            }
        }

        if let Some(max_x) = tiles.iter().map(|&(_, x)| x).reduce(f32::max) {
            if max_x < 0.0 {
                let x = max_x + TILE_WIDTH as f32;
                let tile = if rng.random::<f64>() < 0.5 {
                    GroundTile::regular(x)
                } else {
                    GroundTile::bumpy(x)
                };
                scene.add(Actor::GroundTile(tile));
            }
        }

        for (id, x) in tiles {
            if x < -(TILE_WIDTH as f32) {
                scene.remove(id);
            }
        }
    }
}
