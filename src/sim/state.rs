//! Shared game state and phase transitions
//!
//! Everything entities need to reach during an update pass lives in
//! [`World`]. Outcomes the runtime must act on (sounds, a new high score)
//! are queued as [`GameEvent`]s and drained once per frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actor::{Actor, Resident};
use super::entity::{EntityManager, Scene};
use super::ground::GroundManager;
use super::input::FrameInput;
use super::obstacle::ObstacleManager;
use super::overlay::GameOverOverlay;
use super::score::ScoreBoard;
use super::sky::SkyManager;
use super::trex::{Trex, TrexSignal};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for the first jump
    StandBy,
    /// Intro jump while the curtain slides open
    Transition,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended, waiting for a restart
    GameOver,
}

/// Something the runtime should react to after the update pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Sound(SoundEffect),
    /// The high score was beaten; carries the new value
    NewHighScore(i32),
    /// A new run started from the game-over screen
    Replayed,
}

#[derive(Debug, Clone)]
pub struct World {
    pub phase: GamePhase,
    pub trex: Trex,
    pub score: ScoreBoard,
    pub overlay: GameOverOverlay,
    pub ground: GroundManager,
    pub obstacles: ObstacleManager,
    pub sky: SkyManager,
    /// Input sampled for the current frame
    pub input: FrameInput,
    /// Display scale, for hit-testing pointer input
    pub zoom: f32,
    /// Left edge of the intro curtain
    pub curtain_x: f32,
    pub rng: Pcg32,
    events: Vec<GameEvent>,
}

impl World {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let trex = Trex::new(Vec2::new(TREX_START_X, TREX_START_Y), &mut rng);
        Self {
            phase: GamePhase::StandBy,
            trex,
            score: ScoreBoard::new(Vec2::new(SCORE_BOARD_X, SCORE_BOARD_Y)),
            overlay: GameOverOverlay::new(),
            ground: GroundManager::new(),
            obstacles: ObstacleManager::new(),
            sky: SkyManager::new(),
            input: FrameInput::default(),
            zoom: 1.0,
            curtain_x: TREX_SPRITE_WIDTH as f32,
            rng,
            events: Vec::new(),
        }
    }

    /// Register the residents and lay the first ground tile
    pub fn populate(&mut self, entities: &mut EntityManager<Actor>) {
        for resident in [
            Resident::Trex,
            Resident::GroundManager,
            Resident::ScoreBoard,
            Resident::ObstacleManager,
            Resident::GameOverOverlay,
            Resident::SkyManager,
        ] {
            entities.add(Actor::Resident(resident));
        }
        self.ground.initialize(&mut entities.scene());
    }

    /// Leave the title screen with an intro jump
    pub fn start_game(&mut self) -> bool {
        if self.phase != GamePhase::StandBy {
            return false;
        }
        self.score.set_score(0.0);
        self.phase = GamePhase::Transition;
        if self.trex.begin_jump() {
            self.play(SoundEffect::ButtonPress);
        }
        log::info!("Game started");
        true
    }

    /// Start a fresh run from the game-over screen
    pub fn replay(&mut self, scene: &mut Scene<'_, Actor>) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.trex.initialize();
        self.obstacles.reset(scene);
        self.obstacles.set_enabled(true);
        self.overlay.set_enabled(false);
        self.score.set_score(0.0);
        self.ground.initialize(scene);
        self.events.push(GameEvent::Replayed);
        log::info!("Replay");
        true
    }

    pub fn on_trex_signal(&mut self, signal: TrexSignal) {
        match signal {
            TrexSignal::JumpComplete => self.on_jump_complete(),
            TrexSignal::Died => self.on_trex_died(),
        }
    }

    fn on_jump_complete(&mut self) {
        if self.phase == GamePhase::Transition {
            self.phase = GamePhase::Playing;
            self.trex.initialize();
            self.obstacles.set_enabled(true);
        }
    }

    fn on_trex_died(&mut self) {
        self.phase = GamePhase::GameOver;
        self.obstacles.set_enabled(false);
        self.overlay.set_enabled(true);
        self.play(SoundEffect::Hit);

        let score = self.score.display_score();
        log::info!("Game over at {score}");
        if score > self.score.high_score() {
            log::info!("New high score: {score}");
            self.score.set_high_score(score);
            self.events.push(GameEvent::NewHighScore(score));
        }
    }

    /// Pause or resume; only meaningful mid-run
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            _ => return false,
        };
        true
    }

    /// Slide the intro curtain right
    pub fn advance_curtain(&mut self, dt: f32) {
        self.curtain_x += dt * FADE_IN_SPEED;
    }

    pub fn play(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound(effect));
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
