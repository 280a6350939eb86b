//! Per-frame input snapshot and the in-game controls

use glam::Vec2;

use super::trex::{Trex, TrexState};

/// Keys and pointer state sampled once per frame
///
/// Every field is a *held* state; edges are derived by comparing against the
/// previous frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Up or Space
    pub jump: bool,
    /// Down
    pub duck: bool,
    /// Pointer location in window pixels (after zoom)
    pub pointer: Option<Vec2>,
    /// Primary pointer button
    pub pointer_pressed: bool,
    /// Escape
    pub exit: bool,
    /// Clear the saved high score
    pub reset_high_score: bool,
    /// Switch between normal and zoomed display
    pub toggle_display: bool,
    pub pause: bool,
}

impl FrameInput {
    /// Pointer held down at `position`
    pub fn clicked_at(position: Vec2) -> Self {
        Self {
            pointer: Some(position),
            pointer_pressed: true,
            ..Default::default()
        }
    }
}

/// Turns jump and duck keys into T-Rex commands while playing
#[derive(Debug, Clone, Default)]
pub struct InputController {
    previous_jump: bool,
    blocked: bool,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply this frame's keys; returns true if a jump was started
    pub fn process(&mut self, trex: &mut Trex, input: &FrameInput) -> bool {
        let mut jumped = false;

        if !self.blocked {
            if input.jump && !self.previous_jump {
                if trex.state() != TrexState::Jumping {
                    jumped = trex.begin_jump();
                }
            } else if trex.state() == TrexState::Jumping && !input.jump {
                trex.cancel_jump();
            } else if input.duck {
                if trex.is_airborne() {
                    trex.drop();
                } else {
                    trex.duck();
                }
            } else if trex.state() == TrexState::Ducking {
                trex.get_up();
            }
        }

        self.blocked = false;
        self.previous_jump = input.jump;
        jumped
    }

    /// Ignore the next frame, so the key that restarted a run does not also jump
    pub fn block(&mut self) {
        self.blocked = true;
    }
}
