//! Sky decoration and the day/night cycle
//!
//! Night falls each time the display score enters a new band of
//! [`NIGHT_TIME_SCORE`] points and lasts [`NIGHT_TIME_DURATION_SCORE`]
//! points. Brightness fades linearly over [`TRANSITION_DURATION`] seconds
//! and the sprite palette flips once, when the fade crosses the midpoint.

use glam::Vec2;
use rand::Rng;

use super::actor::Actor;
use super::animation::SpriteAnimation;
use super::entity::{EntityId, Scene};
use super::rect::Rect;
use super::trex::Trex;
use crate::consts::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::renderer::{Canvas, Color, Palette, Sprite};

pub const NIGHT_TIME_SCORE: i32 = 700;
pub const NIGHT_TIME_DURATION_SCORE: i32 = 250;
/// Seconds for a full fade between day and night
pub const TRANSITION_DURATION: f32 = 2.0;

const OVERLAY_EPSILON: f32 = 0.01;

pub const STAR_DRAW_ORDER: i32 = -3;
pub const MOON_DRAW_ORDER: i32 = -2;
pub const CLOUD_DRAW_ORDER: i32 = -1;

const STAR_MIN_POS_Y: i32 = 10;
const STAR_MAX_POS_Y: i32 = 60;
const STAR_MIN_DISTANCE: i32 = 120;
const STAR_MAX_DISTANCE: i32 = 380;
const CLOUD_MIN_POS_Y: i32 = 20;
const CLOUD_MAX_POS_Y: i32 = 70;
const CLOUD_MIN_DISTANCE: i32 = 150;
const CLOUD_MAX_DISTANCE: i32 = 400;
const MOON_POS_Y: f32 = 20.0;
/// Sky objects left of this are recycled
pub const SKY_DESPAWN_POS_X: f32 = -100.0;

const CLOUD_SPRITE: Sprite = Sprite::new(87, 0, 46, 17);
const STAR_SPRITE: Sprite = Sprite::new(645, 2, 9, 9);
const STAR_TWINKLE_SPRITE: Sprite = Sprite::new(645, 11, 9, 9);
const STAR_ANIMATION_FRAME_LENGTH: f32 = 0.4;

const MOON_SPRITE_X: i32 = 484;
const MOON_SPRITE_Y: i32 = 2;
const MOON_SPRITE_WIDTH: i32 = 20;
const MOON_SPRITE_HEIGHT: i32 = 40;
/// Sheet offsets for each moon phase, cycled once per night
const MOON_PHASE_OFFSETS: [i32; 7] = [140, 120, 100, 60, 40, 20, 0];
/// The full moon is twice as wide
const FULL_MOON_PHASE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Day,
    ToNight,
    Night,
    ToDay,
}

/// Brightness and palette state of the sky
#[derive(Debug, Clone)]
pub struct DayNightCycle {
    /// 1 is full day, 0 full night
    brightness: f32,
    phase: CyclePhase,
    night_count: u32,
    night_start_score: i32,
    previous_score: i32,
    palette: Palette,
    palette_swaps: u32,
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            phase: CyclePhase::Day,
            night_count: 0,
            night_start_score: 0,
            previous_score: 0,
            palette: Palette::Day,
            palette_swaps: 0,
        }
    }
}

impl DayNightCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn night_count(&self) -> u32 {
        self.night_count
    }

    pub fn is_night(&self) -> bool {
        self.brightness < 0.5
    }

    /// Sprite sheet variant to draw with
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Total number of palette flips so far
    pub fn palette_swaps(&self) -> u32 {
        self.palette_swaps
    }

    pub fn clear_color(&self) -> Color {
        Color::gray(self.brightness)
    }

    /// Strength of the grey veil that hides the palette flip
    pub fn overlay_visibility(&self) -> f32 {
        ((0.25 - (0.5 - self.brightness).abs()) / 0.25).clamp(0.0, 1.0)
    }

    pub fn update(&mut self, score: i32, dt: f32) {
        let prev = self.previous_score;
        if prev != 0 && prev < score && prev / NIGHT_TIME_SCORE != score / NIGHT_TIME_SCORE {
            self.transition_to_night(score);
        }

        if self.is_night() && score - self.night_start_score >= NIGHT_TIME_DURATION_SCORE {
            self.transition_to_day();
        }

        if score < NIGHT_TIME_SCORE && (self.is_night() || self.phase == CyclePhase::ToNight) {
            self.force_day();
        }

        self.update_transition(dt);
        self.previous_score = score;
    }

    fn transition_to_night(&mut self, score: i32) -> bool {
        if self.is_night() || self.phase == CyclePhase::ToNight {
            return false;
        }
        log::debug!("Night falls at {score}");
        self.night_start_score = score;
        self.phase = CyclePhase::ToNight;
        self.brightness = 1.0;
        self.night_count += 1;
        true
    }

    fn transition_to_day(&mut self) -> bool {
        if !self.is_night() || self.phase == CyclePhase::ToDay {
            return false;
        }
        self.phase = CyclePhase::ToDay;
        self.brightness = 0.0;
        true
    }

    /// Back to day immediately, e.g. after the score was reset
    fn force_day(&mut self) {
        if self.phase == CyclePhase::ToNight && !self.is_night() {
            // Still bright: fade back up from here
            self.phase = CyclePhase::ToDay;
        } else {
            self.transition_to_day();
        }
    }

    fn update_transition(&mut self, dt: f32) {
        match self.phase {
            CyclePhase::ToNight => {
                self.brightness = (self.brightness - dt / TRANSITION_DURATION).max(0.0);
                if self.brightness < 0.5 {
                    self.set_palette(Palette::Night);
                }
                if self.brightness <= 0.0 {
                    self.phase = CyclePhase::Night;
                }
            }
            CyclePhase::ToDay => {
                self.brightness = (self.brightness + dt / TRANSITION_DURATION).min(1.0);
                if self.brightness >= 0.5 {
                    self.set_palette(Palette::Day);
                }
                if self.brightness >= 1.0 {
                    self.phase = CyclePhase::Day;
                }
            }
            CyclePhase::Day | CyclePhase::Night => {}
        }
    }

    fn set_palette(&mut self, palette: Palette) {
        if self.palette != palette {
            self.palette = palette;
            self.palette_swaps += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyObjectKind {
    Cloud,
    Star,
    Moon,
}

/// Background decoration drifting slower than the ground
#[derive(Debug, Clone)]
pub struct SkyObject {
    kind: SkyObjectKind,
    position: Vec2,
    twinkle: Option<SpriteAnimation>,
}

impl SkyObject {
    pub fn cloud(position: Vec2) -> Self {
        Self {
            kind: SkyObjectKind::Cloud,
            position,
            twinkle: None,
        }
    }

    pub fn star(position: Vec2) -> Self {
        Self {
            kind: SkyObjectKind::Star,
            position,
            twinkle: Some(SpriteAnimation::looping(&[
                (STAR_SPRITE, 0.0),
                (STAR_TWINKLE_SPRITE, STAR_ANIMATION_FRAME_LENGTH),
                (STAR_SPRITE, STAR_ANIMATION_FRAME_LENGTH * 2.0),
            ])),
        }
    }

    pub fn moon(position: Vec2) -> Self {
        Self {
            kind: SkyObjectKind::Moon,
            position,
            twinkle: None,
        }
    }

    pub fn kind(&self) -> SkyObjectKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn draw_order(&self) -> i32 {
        match self.kind {
            SkyObjectKind::Cloud => CLOUD_DRAW_ORDER,
            SkyObjectKind::Star => STAR_DRAW_ORDER,
            SkyObjectKind::Moon => MOON_DRAW_ORDER,
        }
    }

    /// Fraction of the T-Rex speed this object drifts at
    pub fn parallax(&self) -> f32 {
        match self.kind {
            SkyObjectKind::Cloud => 0.5,
            SkyObjectKind::Star => 0.2,
            SkyObjectKind::Moon => 0.1,
        }
    }

    pub fn update(&mut self, trex: &Trex, dt: f32) {
        if !trex.is_alive() {
            return;
        }
        self.position.x -= trex.speed() * self.parallax() * dt;
        if let Some(twinkle) = self.twinkle.as_mut() {
            twinkle.update(dt);
        }
        // The moon is never despawned, it wraps around
        if self.kind == SkyObjectKind::Moon && self.position.x < SKY_DESPAWN_POS_X {
            self.position = Vec2::new(WINDOW_WIDTH as f32, MOON_POS_Y);
        }
    }

    pub fn draw(&self, cycle: &DayNightCycle, canvas: &mut dyn Canvas) {
        match self.kind {
            SkyObjectKind::Cloud => CLOUD_SPRITE.draw(canvas, self.position, Color::WHITE),
            SkyObjectKind::Star if cycle.is_night() => {
                if let Some(twinkle) = &self.twinkle {
                    twinkle.draw(canvas, self.position, Color::WHITE);
                }
            }
            SkyObjectKind::Moon if cycle.is_night() => {
                moon_sprite(cycle.night_count()).draw(canvas, self.position, Color::WHITE)
            }
            _ => {}
        }
    }
}

fn moon_sprite(night_count: u32) -> Sprite {
    let phase = night_count as usize % MOON_PHASE_OFFSETS.len();
    let width = if phase == FULL_MOON_PHASE {
        MOON_SPRITE_WIDTH * 2
    } else {
        MOON_SPRITE_WIDTH
    };
    Sprite::new(
        MOON_SPRITE_X + MOON_PHASE_OFFSETS[phase],
        MOON_SPRITE_Y,
        width,
        MOON_SPRITE_HEIGHT,
    )
}

/// Spawns sky decoration and owns the day/night cycle
#[derive(Debug, Clone, Default)]
pub struct SkyManager {
    cycle: DayNightCycle,
    moon: Option<EntityId>,
    target_cloud_distance: i32,
    target_star_distance: i32,
}

impl SkyManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle(&self) -> &DayNightCycle {
        &self.cycle
    }

    pub fn update(
        &mut self,
        scene: &mut Scene<'_, Actor>,
        score: i32,
        rng: &mut impl Rng,
        dt: f32,
    ) {
        if self.moon.is_none() {
            let moon = SkyObject::moon(Vec2::new(WINDOW_WIDTH as f32, MOON_POS_Y));
            self.moon = Some(scene.add(Actor::SkyObject(moon)));
        }

        self.handle_spawning(scene, SkyObjectKind::Cloud, rng);
        self.handle_spawning(scene, SkyObjectKind::Star, rng);

        let gone: Vec<EntityId> = scene
            .iter()
            .filter_map(|(id, actor)| actor.as_sky_object().map(|s| (id, s)))
            .filter(|(_, s)| s.kind() != SkyObjectKind::Moon && s.position().x < SKY_DESPAWN_POS_X)
            .map(|(id, _)| id)
            .collect();
        for id in gone {
            scene.remove(id);
        }

        self.cycle.update(score, dt);
    }

    /// Add another cloud or star once the newest one has drifted far enough
    fn handle_spawning(
        &mut self,
        scene: &mut Scene<'_, Actor>,
        kind: SkyObjectKind,
        rng: &mut impl Rng,
    ) {
        let rightmost = scene
            .iter()
            .filter_map(|(_, actor)| actor.as_sky_object())
            .filter(|s| s.kind() == kind)
            .map(|s| s.position().x)
            .reduce(f32::max);
        let target = match kind {
            SkyObjectKind::Cloud => &mut self.target_cloud_distance,
            _ => &mut self.target_star_distance,
        };

        let due = rightmost.is_none_or(|x| WINDOW_WIDTH as f32 - x >= *target as f32);
        if !due {
            return;
        }

        let x = WINDOW_WIDTH as f32;
        let object = match kind {
            SkyObjectKind::Cloud => {
                *target = rng.random_range(CLOUD_MIN_DISTANCE..=CLOUD_MAX_DISTANCE);
                let y = rng.random_range(CLOUD_MIN_POS_Y..=CLOUD_MAX_POS_Y);
                SkyObject::cloud(Vec2::new(x, y as f32))
            }
            _ => {
                *target = rng.random_range(STAR_MIN_DISTANCE..=STAR_MAX_DISTANCE);
                let y = rng.random_range(STAR_MIN_POS_Y..=STAR_MAX_POS_Y);
                SkyObject::star(Vec2::new(x, y as f32))
            }
        };
        scene.add(Actor::SkyObject(object));
    }

    /// Grey veil drawn over everything mid-transition
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let visibility = self.cycle.overlay_visibility();
        if visibility > OVERLAY_EPSILON {
            canvas.fill_rect(
                Rect::new(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT),
                Color::GRAY.faded(visibility),
            );
        }
    }
}
