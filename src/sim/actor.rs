//! The concrete entity type scheduled by the game
//!
//! Long-lived singletons ("residents") keep their state in [`World`] so other
//! entities can reach them during the pass; the entity list only decides when
//! they update and draw. Short-lived entities carry their own state.

use super::entity::{GameEntity, Scene};
use super::ground::GroundTile;
use super::obstacle::Obstacle;
use super::overlay::OVERLAY_DRAW_ORDER;
use super::sky::{SkyObject, SkyObjectKind};
use super::state::World;
use super::trex::TrexSignal;
use crate::audio::SoundEffect;
use crate::consts::TREX_DRAW_ORDER;
use crate::renderer::Canvas;
use crate::settings::RenderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resident {
    Trex,
    ScoreBoard,
    GameOverOverlay,
    GroundManager,
    ObstacleManager,
    SkyManager,
}

#[derive(Debug, Clone)]
pub enum Actor {
    Resident(Resident),
    GroundTile(GroundTile),
    Obstacle(Obstacle),
    SkyObject(SkyObject),
}

/// Variant tag used to filter the entity list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Trex,
    ScoreBoard,
    GameOverOverlay,
    GroundManager,
    ObstacleManager,
    SkyManager,
    GroundTile,
    CactusGroup,
    Pterodactyl,
    Cloud,
    Star,
    Moon,
}

impl ActorKind {
    pub fn is_obstacle(self) -> bool {
        matches!(self, ActorKind::CactusGroup | ActorKind::Pterodactyl)
    }

    pub fn is_sky_object(self) -> bool {
        matches!(self, ActorKind::Cloud | ActorKind::Star | ActorKind::Moon)
    }
}

impl Actor {
    pub fn as_obstacle(&self) -> Option<&Obstacle> {
        match self {
            Actor::Obstacle(obstacle) => Some(obstacle),
            _ => None,
        }
    }

    pub fn as_sky_object(&self) -> Option<&SkyObject> {
        match self {
            Actor::SkyObject(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_ground_tile(&self) -> Option<&GroundTile> {
        match self {
            Actor::GroundTile(tile) => Some(tile),
            _ => None,
        }
    }
}

impl GameEntity for Actor {
    type Kind = ActorKind;
    type World = World;

    fn kind(&self) -> ActorKind {
        match self {
            Actor::Resident(resident) => match resident {
                Resident::Trex => ActorKind::Trex,
                Resident::ScoreBoard => ActorKind::ScoreBoard,
                Resident::GameOverOverlay => ActorKind::GameOverOverlay,
                Resident::GroundManager => ActorKind::GroundManager,
                Resident::ObstacleManager => ActorKind::ObstacleManager,
                Resident::SkyManager => ActorKind::SkyManager,
            },
            Actor::GroundTile(_) => ActorKind::GroundTile,
            Actor::Obstacle(obstacle) if obstacle.is_pterodactyl() => ActorKind::Pterodactyl,
            Actor::Obstacle(_) => ActorKind::CactusGroup,
            Actor::SkyObject(object) => match object.kind() {
                SkyObjectKind::Cloud => ActorKind::Cloud,
                SkyObjectKind::Star => ActorKind::Star,
                SkyObjectKind::Moon => ActorKind::Moon,
            },
        }
    }

    fn draw_order(&self) -> i32 {
        match self {
            Actor::Resident(Resident::Trex) => TREX_DRAW_ORDER,
            Actor::Resident(Resident::ScoreBoard | Resident::GameOverOverlay) => OVERLAY_DRAW_ORDER,
            Actor::Resident(Resident::SkyManager) => i32::MAX,
            Actor::Resident(Resident::GroundManager | Resident::ObstacleManager) => 0,
            Actor::GroundTile(_) => 0,
            Actor::Obstacle(obstacle) => obstacle.draw_order(),
            Actor::SkyObject(object) => object.draw_order(),
        }
    }

    fn update(&mut self, scene: &mut Scene<'_, Self>, world: &mut World, dt: f32) {
        match self {
            Actor::Resident(Resident::Trex) => {
                if let Some(signal) = world.trex.update(dt, &mut world.rng) {
                    world.on_trex_signal(signal);
                }
            }
            Actor::Resident(Resident::ScoreBoard) => {
                let (speed, alive) = (world.trex.speed(), world.trex.is_alive());
                if world.score.update(speed, alive, dt) {
                    world.play(SoundEffect::ScoreReached);
                }
            }
            Actor::Resident(Resident::GameOverOverlay) => {
                if world.overlay.update(&world.input, world.zoom) {
                    world.replay(scene);
                }
            }
            Actor::Resident(Resident::GroundManager) => {
                world
                    .ground
                    .update(scene, world.trex.speed(), dt, &mut world.rng);
            }
            Actor::Resident(Resident::ObstacleManager) => {
                let score = world.score.display_score();
                world
                    .obstacles
                    .update(scene, &world.trex, score, &mut world.rng);
            }
            Actor::Resident(Resident::SkyManager) => {
                let score = world.score.display_score();
                world.sky.update(scene, score, &mut world.rng, dt);
            }
            // Scrolled by the ground manager
            Actor::GroundTile(_) => {}
            Actor::Obstacle(obstacle) => {
                if let Some(TrexSignal::Died) = obstacle.update(&mut world.trex, dt) {
                    world.on_trex_signal(TrexSignal::Died);
                }
            }
            Actor::SkyObject(object) => object.update(&world.trex, dt),
        }
    }

    fn draw(&self, world: &World, config: &RenderConfig, canvas: &mut dyn Canvas) {
        match self {
            Actor::Resident(Resident::Trex) => world.trex.draw(canvas, config.trex_tint),
            Actor::Resident(Resident::ScoreBoard) => world.score.draw(canvas),
            Actor::Resident(Resident::GameOverOverlay) => world.overlay.draw(canvas),
            Actor::Resident(Resident::SkyManager) => world.sky.draw(canvas),
            Actor::Resident(Resident::GroundManager | Resident::ObstacleManager) => {}
            Actor::GroundTile(tile) => tile.draw(canvas),
            Actor::Obstacle(obstacle) => obstacle.draw(canvas),
            Actor::SkyObject(object) => object.draw(world.sky.cycle(), canvas),
        }
    }
}
