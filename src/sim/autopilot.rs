//! Scripted player for headless runs
//!
//! Looks a speed-scaled distance ahead of the T-Rex and picks the cheapest
//! dodge for the nearest obstacle: jump over cacti and low pterodactyls, duck
//! under the middle ones, ignore the ones flying overhead.

use super::actor::Actor;
use super::entity::EntityManager;
use super::input::FrameInput;
use super::obstacle::PTERODACTYL_SPEED;
use super::rect::Rect;
use super::state::{GamePhase, World};
use crate::consts::{TREX_SPRITE_HEIGHT, TREX_SPRITE_WIDTH};

/// Seconds of travel ahead at which a jump is started
const JUMP_LEAD_TIME: f32 = 0.2;
/// Seconds of travel ahead at which ducking starts
const DUCK_LEAD_TIME: f32 = 0.4;
/// How far the top edge drops when ducking
const DUCK_CLEARANCE: i32 = 20;
/// Frames to linger on the game-over screen before restarting
const RESTART_DELAY_FRAMES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dodge {
    Jump,
    Duck,
}

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    previous_jump: bool,
    game_over_frames: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide this frame's keys from the state left by the previous pass
    pub fn next_input(&mut self, world: &World, entities: &EntityManager<Actor>) -> FrameInput {
        let mut input = FrameInput::default();

        if world.phase == GamePhase::GameOver {
            self.game_over_frames += 1;
        } else {
            self.game_over_frames = 0;
        }

        match world.phase {
            GamePhase::StandBy => input.jump = !self.previous_jump,
            // Press, then let go: the overlay restarts on release
            GamePhase::GameOver => {
                input.jump = self.game_over_frames > RESTART_DELAY_FRAMES && !self.previous_jump;
            }
            GamePhase::Playing => {
                let dodge = nearest_threat(world, entities);
                if world.trex.is_airborne() {
                    input.jump = self.previous_jump;
                } else {
                    input.jump = dodge == Some(Dodge::Jump) && !self.previous_jump;
                    input.duck = dodge == Some(Dodge::Duck);
                }
            }
            GamePhase::Transition | GamePhase::Paused => {}
        }

        self.previous_jump = input.jump;
        input
    }
}

fn nearest_threat(world: &World, entities: &EntityManager<Actor>) -> Option<Dodge> {
    let trex = &world.trex;
    let body = Rect::at(trex.position(), TREX_SPRITE_WIDTH, TREX_SPRITE_HEIGHT);

    entities
        .iter()
        .filter_map(|(_, actor)| actor.as_obstacle())
        .filter_map(|obstacle| {
            let hitbox = obstacle.collision_box();
            if hitbox.right() <= body.left() || hitbox.bottom() <= body.top() {
                return None;
            }
            let gap = (hitbox.left() - body.right()) as f32;
            let closing_speed = if obstacle.is_pterodactyl() {
                trex.speed() + PTERODACTYL_SPEED
            } else {
                trex.speed()
            };

            let dodge = if obstacle.is_pterodactyl() && hitbox.bottom() <= body.top() + DUCK_CLEARANCE
            {
                (gap <= closing_speed * DUCK_LEAD_TIME).then_some(Dodge::Duck)
            } else {
                (gap <= closing_speed * JUMP_LEAD_TIME).then_some(Dodge::Jump)
            };
            dodge.map(|d| (gap, d))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, dodge)| dodge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::obstacle::{GroupSize, Obstacle};
    use glam::Vec2;

    fn playing_with(obstacle: Option<Obstacle>) -> (World, EntityManager<Actor>) {
        let mut world = World::new(11);
        world.phase = GamePhase::Playing;
        world.trex.initialize();
        let mut entities = EntityManager::new();
        if let Some(obstacle) = obstacle {
            entities.add(Actor::Obstacle(obstacle));
        }
        entities.update(&mut world, 0.0);
        (world, entities)
    }

    #[test]
    fn test_presses_jump_on_title_screen() {
        let world = World::new(1);
        let entities = EntityManager::new();
        let mut pilot = Autopilot::new();
        assert!(pilot.next_input(&world, &entities).jump);
        // Edges only: the next frame lets go
        assert!(!pilot.next_input(&world, &entities).jump);
    }

    #[test]
    fn test_jumps_over_close_cactus_only() {
        let near = Obstacle::cactus_group(false, GroupSize::Small, Vec2::new(69.0, 144.0), 9);
        let (world, entities) = playing_with(Some(near));
        let input = Autopilot::new().next_input(&world, &entities);
        assert!(input.jump);
        assert!(!input.duck);

        let far = Obstacle::cactus_group(false, GroupSize::Small, Vec2::new(500.0, 144.0), 9);
        let (world, entities) = playing_with(Some(far));
        assert_eq!(
            Autopilot::new().next_input(&world, &entities),
            FrameInput::default()
        );
    }

    #[test]
    fn test_ducks_under_middle_pterodactyl_and_ignores_high_one() {
        let middle = Obstacle::pterodactyl(Vec2::new(80.0, 112.0), 12);
        let (world, entities) = playing_with(Some(middle));
        let input = Autopilot::new().next_input(&world, &entities);
        assert!(input.duck);
        assert!(!input.jump);

        let high = Obstacle::pterodactyl(Vec2::new(80.0, 74.0), 12);
        let (world, entities) = playing_with(Some(high));
        assert_eq!(
            Autopilot::new().next_input(&world, &entities),
            FrameInput::default()
        );
    }

    #[test]
    fn test_jumps_over_low_pterodactyl() {
        let low = Obstacle::pterodactyl(Vec2::new(80.0, 140.0), 12);
        let (world, entities) = playing_with(Some(low));
        assert!(Autopilot::new().next_input(&world, &entities).jump);
    }

    #[test]
    fn test_restarts_after_delay_with_press_and_release() {
        let mut world = World::new(2);
        world.phase = GamePhase::GameOver;
        let entities = EntityManager::new();
        let mut pilot = Autopilot::new();
        for _ in 0..RESTART_DELAY_FRAMES {
            assert!(!pilot.next_input(&world, &entities).jump);
        }
        assert!(pilot.next_input(&world, &entities).jump);
        assert!(!pilot.next_input(&world, &entities).jump);
    }

    #[test]
    fn test_drives_world_out_of_title_screen() {
        let mut world = World::new(3);
        let mut entities = EntityManager::new();
        world.populate(&mut entities);
        let mut pilot = Autopilot::new();

        for _ in 0..120 {
            let input = pilot.next_input(&world, &entities);
            if world.phase == GamePhase::StandBy && input.jump {
                world.start_game();
            }
            world.input = input;
            entities.update(&mut world, SIM_DT);
        }
        assert_eq!(world.phase, GamePhase::Playing);
    }
}
