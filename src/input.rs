//! Keyboard state collapsed into one `FrameInput` per frame.
//!
//! Terminals without key-release events only report presses and auto-repeats,
//! so a key counts as held while its last event is recent.  Terminals with
//! release events drop the key as soon as it goes up.

use std::collections::{HashMap, HashSet};

use crossterm::event::KeyCode;

use crate::entities::FrameInput;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  The OS key-repeat rate is ≥ 15 Hz, so a window of 4
/// frames (≈133 ms at 30 FPS) is always refreshed before expiry.
pub const HOLD_WINDOW: u64 = 4;

const LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const FIRE: &[KeyCode] = &[KeyCode::Char(' ')];
const MUTE: &[KeyCode] = &[KeyCode::Char('m'), KeyCode::Char('M')];

#[derive(Debug, Default)]
pub struct HeldKeys {
    /// Frame each held key was last seen (press or repeat).
    last_seen: HashMap<KeyCode, u64>,
    /// Keys pressed since the last `frame_input`, even if already released.
    pressed: HashSet<KeyCode>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: KeyCode, frame: u64) {
        self.last_seen.insert(code.clone(), frame);
        self.pressed.insert(code);
    }

    /// Auto-repeat: keep the key held.
    pub fn repeat(&mut self, code: KeyCode, frame: u64) {
        self.last_seen.insert(code, frame);
    }

    pub fn release(&mut self, code: &KeyCode) {
        self.last_seen.remove(code);
    }

    fn is_held(&self, key: &KeyCode, frame: u64) -> bool {
        self.pressed.contains(key)
            || self
                .last_seen
                .get(key)
                .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
                .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|k| self.is_held(k, frame))
    }

    /// Level state for this frame.  A key pressed and released between two
    /// calls still reads as down once.
    pub fn frame_input(&mut self, frame: u64) -> FrameInput {
        let input = FrameInput {
            left: self.any_held(LEFT, frame),
            right: self.any_held(RIGHT, frame),
            fire: self.any_held(FIRE, frame),
            mute: self.any_held(MUTE, frame),
        };
        self.pressed.clear();
        input
    }
}
