//! Pointer and keyboard input, buffered until the next frame

use crate::sim::TickInput;

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Tap,
    Restart,
    ToggleAutoplay,
}

impl KeyCommand {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Enter" => Some(KeyCommand::Tap),
            "r" | "R" => Some(KeyCommand::Restart),
            "a" | "A" => Some(KeyCommand::ToggleAutoplay),
            _ => None,
        }
    }
}

/// One-shot inputs collected between frames
///
/// Events arrive from browser callbacks at any time; the frame loop takes
/// them once per frame so each tap is applied exactly once.
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pending: TickInput,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self) {
        self.pending.tap = true;
    }

    /// Returns true if the key was recognized
    pub fn key_down(&mut self, key: &str) -> bool {
        match KeyCommand::from_key(key) {
            Some(KeyCommand::Tap) => self.pending.tap = true,
            Some(KeyCommand::Restart) => self.pending.restart = true,
            Some(KeyCommand::ToggleAutoplay) => {
                self.pending.autoplay = !self.pending.autoplay;
                log::info!("Autoplay: {}", self.pending.autoplay);
            }
            None => return false,
        }
        true
    }

    pub fn autoplay(&self) -> bool {
        self.pending.autoplay
    }

    /// Input for this frame; clears one-shot flags, keeps the autoplay toggle
    pub fn take(&mut self) -> TickInput {
        let input = self.pending.clone();
        self.pending.tap = false;
        self.pending.restart = false;
        input
    }
}
