//! Sound effect cues
//!
//! The simulation only decides *when* a sound plays. Playback is delegated
//! to an [`AudioSink`], with [`AudioManager`] applying volume and mute.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Jump started (also the menu button sound)
    ButtonPress,
    /// T-Rex ran into an obstacle
    Hit,
    /// Score crossed a multiple of 100
    ScoreReached,
}

impl SoundEffect {
    /// Asset name the backend loads for this effect
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::ButtonPress => "button-press",
            SoundEffect::Hit => "hit",
            SoundEffect::ScoreReached => "score-reached",
        }
    }

    /// Per-effect mix level
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::ScoreReached => 0.5,
            _ => 1.0,
        }
    }
}

/// Playback backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Audio mixer settings for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Volume an effect would be played at
    pub fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume * effect.base_volume()
        }
    }

    /// Play a sound effect through `sink` (silent effects are skipped)
    pub fn play(&self, sink: &mut dyn AudioSink, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        sink.play(effect, vol);
    }
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {} at {:.2}", effect.asset_name(), volume);
    }
}

/// Sink that remembers everything it was asked to play
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub played: Vec<(SoundEffect, f32)>,
}

impl RecordingSink {
    pub fn effects(&self) -> Vec<SoundEffect> {
        self.played.iter().map(|(e, _)| *e).collect()
    }
}

impl AudioSink for RecordingSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played.push((effect, volume));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_mixing() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(2.0); // clamped to 1.0
        assert!((audio.effective_volume(SoundEffect::Hit) - 0.5).abs() < 1e-6);
        assert!((audio.effective_volume(SoundEffect::ScoreReached) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_muted_skips_playback() {
        let mut audio = AudioManager::new();
        audio.set_muted(true);
        let mut sink = RecordingSink::default();
        audio.play(&mut sink, SoundEffect::Hit);
        assert!(sink.played.is_empty());
    }

    #[test]
    fn test_play_forwards_to_sink() {
        let audio = AudioManager::new();
        let mut sink = RecordingSink::default();
        audio.play(&mut sink, SoundEffect::ButtonPress);
        assert_eq!(sink.effects(), vec![SoundEffect::ButtonPress]);
    }
}
