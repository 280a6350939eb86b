//! Frame loop
//!
//! [`Game`] owns the world and the entity list and drives one frame at a
//! time: hotkeys, player controls, the entity pass, then whatever the pass
//! asked for (sounds, saving a new high score). Rendering and audio go
//! through the [`Canvas`] and [`AudioSink`] seams.

use crate::audio::{AudioManager, AudioSink, SoundEffect};
use crate::consts::*;
use crate::persistence::{SaveState, SaveStore, now_millis};
use crate::renderer::Canvas;
use crate::settings::{DisplayMode, RenderConfig, Settings};
use crate::sim::{
    Actor, EntityManager, FrameInput, GameEvent, GamePhase, InputController, Rect, World,
};

/// Whether the runtime should keep going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Game<S: AudioSink> {
    world: World,
    entities: EntityManager<Actor>,
    controls: InputController,
    /// Held keys from the previous frame, for edge detection
    previous: FrameInput,
    audio: AudioManager,
    sink: S,
    store: SaveStore,
    save: SaveState,
    display_mode: DisplayMode,
    accumulator: f32,
    frames: u64,
}

impl<S: AudioSink> Game<S> {
    /// Set up a run on the title screen, restoring the saved high score
    pub fn new(seed: u64, settings: &Settings, store: SaveStore, sink: S) -> Self {
        let save = store.load_or_default();
        let mut world = World::new(seed);
        world.score.set_high_score(save.high_score);
        world.zoom = settings.display_mode.zoom();

        let mut entities = EntityManager::new();
        world.populate(&mut entities);
        log::info!("New game (seed {seed}, high score {})", save.high_score);

        Self {
            world,
            entities,
            controls: InputController::new(),
            previous: FrameInput::default(),
            audio: AudioManager::from_settings(settings),
            sink,
            store,
            save,
            display_mode: settings.display_mode,
            accumulator: 0.0,
            frames: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn entities(&self) -> &EntityManager<Actor> {
        &self.entities
    }

    pub fn save_state(&self) -> SaveState {
        self.save
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Frames simulated so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run as many fixed steps as `elapsed` wall time covers
    pub fn advance(&mut self, input: FrameInput, elapsed: f32) -> Flow {
        self.accumulator += elapsed.min(MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if self.update(input, SIM_DT) == Flow::Exit {
                return Flow::Exit;
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        Flow::Continue
    }

    /// Simulate one frame
    pub fn update(&mut self, input: FrameInput, dt: f32) -> Flow {
        if input.exit {
            log::info!("Exit requested");
            return Flow::Exit;
        }

        self.world.input = input;
        match self.world.phase {
            GamePhase::Playing => {
                if self.controls.process(&mut self.world.trex, &input) {
                    self.world.play(SoundEffect::ButtonPress);
                }
            }
            GamePhase::Transition => self.world.advance_curtain(dt),
            GamePhase::StandBy => {
                if input.jump && !self.previous.jump {
                    self.world.start_game();
                }
            }
            GamePhase::Paused | GamePhase::GameOver => {}
        }

        if self.world.phase != GamePhase::Paused {
            self.entities.update(&mut self.world, dt);
        }

        if input.reset_high_score && !self.previous.reset_high_score {
            self.reset_high_score();
        }
        if input.toggle_display && !self.previous.toggle_display {
            self.display_mode = self.display_mode.toggled();
            self.world.zoom = self.display_mode.zoom();
            log::info!("Display mode: {}", self.display_mode.as_str());
        }
        if input.pause && !self.previous.pause && self.world.toggle_pause() {
            log::info!("Paused: {}", self.world.phase == GamePhase::Paused);
        }

        self.previous = input;
        self.handle_events();
        self.frames += 1;
        Flow::Continue
    }

    fn handle_events(&mut self) {
        for event in self.world.drain_events() {
            match event {
                GameEvent::Sound(effect) => self.audio.play(&mut self.sink, effect),
                GameEvent::NewHighScore(score) => {
                    self.save = SaveState {
                        high_score: score,
                        high_score_date: now_millis(),
                    };
                    if let Err(e) = self.store.save(&self.save) {
                        log::warn!("Failed to save high score: {e}");
                    }
                }
                GameEvent::Replayed => self.controls.block(),
            }
        }
    }

    fn reset_high_score(&mut self) {
        match self.store.reset() {
            Ok(state) => self.save = state,
            Err(e) => {
                log::warn!("Failed to reset high score: {e}");
                self.save = SaveState::default();
            }
        }
        self.world.score.set_high_score(0);
        log::info!("High score reset");
    }

    /// Render the current frame
    pub fn draw(&self, canvas: &mut dyn Canvas, config: &RenderConfig) {
        let cycle = self.world.sky.cycle();
        canvas.set_zoom(self.display_mode.zoom());
        canvas.clear(cycle.clear_color());
        canvas.set_palette(cycle.palette());

        self.entities.draw(&self.world, config, canvas);

        // Curtain hides everything right of it until the intro jump is done
        if matches!(self.world.phase, GamePhase::StandBy | GamePhase::Transition) {
            let left = self.world.curtain_x as i32;
            if left < WINDOW_WIDTH {
                canvas.fill_rect(
                    Rect::new(left, 0, WINDOW_WIDTH - left, WINDOW_HEIGHT),
                    config.scene_color,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::renderer::{Color, DrawCommand, DrawList, Palette};
    use crate::sim::obstacle::{GroupSize, Obstacle};
    use crate::sim::trex::TrexState;
    use glam::Vec2;
    use tempfile::TempDir;

    fn new_game(dir: &TempDir) -> Game<RecordingSink> {
        Game::new(
            42,
            &Settings::default(),
            SaveStore::in_dir(dir.path()),
            RecordingSink::default(),
        )
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn jump() -> FrameInput {
        FrameInput {
            jump: true,
            ..Default::default()
        }
    }

    /// Put the game mid-run with a cactus about to hit the T-Rex
    fn doomed(game: &mut Game<RecordingSink>, score: f64) {
        game.world.phase = GamePhase::Playing;
        game.world.trex.initialize();
        game.world.score.set_score(score);
        game.entities.add(Actor::Obstacle(Obstacle::cactus_group(
            true,
            GroupSize::Small,
            Vec2::new(20.0, 130.0),
            12,
        )));
        game.update(idle(), SIM_DT);
        game.update(idle(), SIM_DT);
        assert_eq!(game.world().phase, GamePhase::GameOver);
    }

    #[test]
    fn test_exit_stops_before_simulating() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = new_game(&dir);
        let input = FrameInput {
            exit: true,
            ..Default::default()
        };
        assert_eq!(game.update(input, SIM_DT), Flow::Exit);
        assert_eq!(game.frames(), 0);
    }

    #[test]
    fn test_jump_press_starts_game_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = new_game(&dir);
        game.update(jump(), SIM_DT);
        assert_eq!(game.world().phase, GamePhase::Transition);
        assert_eq!(game.sink().effects(), vec![SoundEffect::ButtonPress]);

        // Held key is not a new press
        game.update(jump(), SIM_DT);
        assert_eq!(game.sink().effects().len(), 1);

        let curtain = game.world().curtain_x;
        game.update(idle(), SIM_DT);
        assert!((game.world().curtain_x - curtain - SIM_DT * FADE_IN_SPEED).abs() < 1e-3);

        for _ in 0..60 {
            game.update(idle(), SIM_DT);
        }
        assert_eq!(game.world().phase, GamePhase::Playing);
    }

    #[test]
    fn test_jump_while_playing_plays_button_sound() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = new_game(&dir);
        game.world.phase = GamePhase::Playing;
        game.world.trex.initialize();
        game.update(jump(), SIM_DT);
        assert!(game.world().trex.is_airborne());
        assert_eq!(game.sink().effects(), vec![SoundEffect::ButtonPress]);
    }

    #[test]
    fn test_death_saves_new_high_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = new_game(&dir);
        doomed(&mut game, 120.0);

        assert!(game.sink().effects().contains(&SoundEffect::Hit));
        assert_eq!(game.save_state().high_score, 120);
        let saved = SaveStore::in_dir(dir.path()).load().unwrap();
        assert_eq!(saved.high_score, 120);
        assert!(saved.high_score_date > 0.0);
    }

    #[test]
    fn test_high_score_restored_and_reset() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::in_dir(dir.path());
        store
            .save(&SaveState {
                high_score: 500,
                high_score_date: 1.0,
            })
            .unwrap();

        let mut game = new_game(&dir);
        assert_eq!(game.world().score.high_score(), 500);

        let reset = FrameInput {
            reset_high_score: true,
            ..Default::default()
        };
        game.update(reset, SIM_DT);
        game.update(reset, SIM_DT);
        assert_eq!(game.world().score.high_score(), 0);
        assert_eq!(store.load().unwrap(), SaveState::default());
    }

    #[test]
    fn test_replay_blocks_controls_for_one_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = new_game(&dir);
        doomed(&mut game, 5.0);

        game.update(jump(), SIM_DT);
        game.update(idle(), SIM_DT);
        assert_eq!(game.world().phase, GamePhase::Playing);

        game.update(jump(), SIM_DT);
        assert_eq!(game.world().trex.state(), TrexState::Running);
        game.update(idle(), SIM_DT);
        game.update(jump(), SIM_DT);
        assert!(game.world().trex.is_airborne());
    }

    #[test]
    fn test_pause_freezes_the_world() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = new_game(&dir);
        game.world.phase = GamePhase::Playing;
        game.world.trex.initialize();
        let pause = FrameInput {
            pause: true,
            ..Default::default()
        };
        game.update(pause, SIM_DT);
        assert_eq!(game.world().phase, GamePhase::Paused);

        let score = game.world().score.score();
        for _ in 0..30 {
            game.update(idle(), SIM_DT);
        }
        assert_eq!(game.world().score.score(), score);

        game.update(pause, SIM_DT);
        assert_eq!(game.world().phase, GamePhase::Playing);
    }

    #[test]
    fn test_display_toggle_changes_zoom() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = new_game(&dir);
        let toggle = FrameInput {
            toggle_display: true,
            ..Default::default()
        };
        game.update(toggle, SIM_DT);
        assert_eq!(game.display_mode(), DisplayMode::Zoomed);
        assert_eq!(game.world().zoom, DISPLAY_ZOOM_FACTOR);

        let mut canvas = DrawList::new();
        game.draw(&mut canvas, &RenderConfig::default());
        assert_eq!(canvas.commands[0], DrawCommand::Zoom(DISPLAY_ZOOM_FACTOR));
    }

    #[test]
    fn test_title_screen_draws_curtain_over_day_scene() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = new_game(&dir);
        game.update(idle(), SIM_DT);

        let mut canvas = DrawList::new();
        let config = RenderConfig {
            scene_color: Color::BLACK,
            ..Default::default()
        };
        game.draw(&mut canvas, &config);
        assert_eq!(canvas.commands[1], DrawCommand::Clear(Color::WHITE));
        assert_eq!(canvas.commands[2], DrawCommand::Palette(Palette::Day));
        let last = canvas.commands.last().cloned();
        assert_eq!(
            last,
            Some(DrawCommand::Fill {
                rect: Rect::new(TREX_SPRITE_WIDTH, 0, WINDOW_WIDTH - TREX_SPRITE_WIDTH, WINDOW_HEIGHT),
                color: Color::BLACK,
            })
        );
    }

    #[test]
    fn test_advance_runs_fixed_substeps() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = new_game(&dir);
        game.advance(idle(), 0.055);
        assert_eq!(game.frames(), 3);

        game.advance(idle(), 10.0);
        assert!(game.frames() <= 3 + MAX_SUBSTEPS as u64);
    }
}
