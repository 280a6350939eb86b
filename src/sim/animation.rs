//! Timestamped sprite animations
//!
//! An animation is a list of frames, each becoming current once playback
//! progress reaches its timestamp. The last timestamp marks the end of the
//! animation, so looping animations usually repeat their first sprite there.

use glam::Vec2;

use crate::renderer::{Canvas, Color, Sprite};

/// One frame of a sprite animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub sprite: Sprite,
    /// Seconds from the start of playback
    pub timestamp: f32,
}

#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    frames: Vec<AnimationFrame>,
    playing: bool,
    progress: f32,
    looping: bool,
}

impl Default for SpriteAnimation {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            playing: false,
            progress: 0.0,
            looping: true,
        }
    }
}

impl SpriteAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a looping animation that starts playing immediately
    pub fn looping(frames: &[(Sprite, f32)]) -> Self {
        let mut animation = Self::new();
        for &(sprite, timestamp) in frames {
            animation.add_frame(sprite, timestamp);
        }
        animation.play();
        animation
    }

    /// Build a one-shot animation that starts playing immediately
    pub fn once(frames: &[(Sprite, f32)]) -> Self {
        let mut animation = Self::looping(frames);
        animation.looping = false;
        animation
    }

    pub fn add_frame(&mut self, sprite: Sprite, timestamp: f32) {
        self.frames.push(AnimationFrame { sprite, timestamp });
    }

    /// Frame by insertion index
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn frame(&self, index: usize) -> &AnimationFrame {
        match self.frames.get(index) {
            Some(frame) => frame,
            None => panic!(
                "frame with index {index} does not exist in this animation ({} frames)",
                self.frames.len()
            ),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Largest frame timestamp (0 for an empty animation)
    pub fn duration(&self) -> f32 {
        self.frames
            .iter()
            .map(|f| f.timestamp)
            .fold(0.0, f32::max)
    }

    /// Latest frame whose timestamp has been reached; later insertions win ties
    pub fn current_frame(&self) -> Option<&AnimationFrame> {
        let mut current: Option<&AnimationFrame> = None;
        for frame in self.frames.iter().filter(|f| f.timestamp <= self.progress) {
            if current.is_none_or(|c| frame.timestamp >= c.timestamp) {
                current = Some(frame);
            }
        }
        current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Halt playback and rewind
    pub fn stop(&mut self) {
        self.playing = false;
        self.progress = 0.0;
    }

    /// Stop and drop every frame
    pub fn clear(&mut self) {
        self.stop();
        self.frames.clear();
    }

    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        self.progress += dt;
        let duration = self.duration();
        if self.progress > duration {
            if self.looping {
                self.progress -= duration;
            } else {
                self.stop();
            }
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, position: Vec2, tint: Color) {
        if let Some(frame) = self.current_frame() {
            frame.sprite.draw(canvas, position, tint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Sprite = Sprite::new(0, 0, 10, 10);
    const B: Sprite = Sprite::new(10, 0, 10, 10);

    fn flap() -> SpriteAnimation {
        SpriteAnimation::looping(&[(A, 0.0), (B, 0.2), (A, 0.4)])
    }

    #[test]
    fn test_current_frame_follows_progress() {
        let mut anim = flap();
        assert_eq!(anim.current_frame().map(|f| f.sprite), Some(A));
        anim.update(0.25);
        assert_eq!(anim.current_frame().map(|f| f.sprite), Some(B));
    }

    #[test]
    fn test_looping_wraps_progress() {
        let mut anim = flap();
        anim.update(0.5);
        assert!(anim.is_playing());
        assert!((anim.progress() - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_one_shot_stops_and_rewinds() {
        let mut anim = SpriteAnimation::once(&[(A, 0.0), (B, 1.0), (A, 1.5)]);
        anim.update(2.0);
        assert!(!anim.is_playing());
        assert_eq!(anim.progress(), 0.0);
    }

    #[test]
    fn test_duration_of_empty_animation() {
        let anim = SpriteAnimation::new();
        assert_eq!(anim.duration(), 0.0);
        assert!(anim.current_frame().is_none());
    }

    #[test]
    fn test_ties_pick_latest_frame() {
        let anim = SpriteAnimation::looping(&[(A, 0.0), (B, 0.0)]);
        assert_eq!(anim.current_frame().map(|f| f.sprite), Some(B));
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn test_frame_out_of_range_panics() {
        flap().frame(3);
    }

    #[test]
    fn test_clear_empties_and_stops() {
        let mut anim = flap();
        anim.clear();
        assert_eq!(anim.frame_count(), 0);
        assert!(!anim.is_playing());
    }
}
