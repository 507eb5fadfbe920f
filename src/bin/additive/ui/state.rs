//! Editor state that lives only on the UI thread

use std::{collections::VecDeque, path::Path};

use additive_midi::{
    harmonic::NUM_HARMONICS, io::midi::TimedEvent, preset::PRESET_EXTENSION, store::ProfileSlot,
};

/// Expanded events kept for the log panel
pub const EVENT_LOG_LEN: usize = 64;

/// Note played by the lowest key of the computer keyboard row
const KEYBOARD_BASE_NOTE: u8 = 60;

/// Piano layout on the bottom letter row, white keys on z..m, black keys above
const KEYBOARD_LAYOUT: [char; 13] = [
    'z', 's', 'x', 'd', 'c', 'v', 'g', 'b', 'h', 'n', 'j', 'm', ',',
];

/// Panel that receives arrow keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Harm1,
    Harm2,
    Morph,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Harm1 => Focus::Harm2,
            Focus::Harm2 => Focus::Morph,
            Focus::Morph => Focus::Harm1,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Harm1 => Focus::Morph,
            Focus::Harm2 => Focus::Harm1,
            Focus::Morph => Focus::Harm2,
        }
    }

    /// Profile edited by this panel, if any
    pub fn slot(self) -> Option<ProfileSlot> {
        match self {
            Focus::Harm1 => Some(ProfileSlot::Harm1),
            Focus::Harm2 => Some(ProfileSlot::Harm2),
            Focus::Morph => None,
        }
    }
}

pub struct UiState {
    pub focus: Focus,
    /// Selected harmonic in the focused profile
    pub selected: usize,
    /// Keys latched on by the computer keyboard
    pub held: [bool; 128],
    pub log: VecDeque<TimedEvent>,
    pub status: String,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            focus: Focus::Harm1,
            selected: 0,
            held: [false; 128],
            log: VecDeque::with_capacity(EVENT_LOG_LEN),
            status: String::new(),
        }
    }

    pub fn select_left(&mut self) {
        self.selected = self.selected.checked_sub(1).unwrap_or(NUM_HARMONICS - 1);
    }

    pub fn select_right(&mut self) {
        self.selected = (self.selected + 1) % NUM_HARMONICS;
    }

    /// Append to the log, dropping the oldest entries past [`EVENT_LOG_LEN`]
    pub fn push_event(&mut self, event: TimedEvent) {
        if self.log.len() == EVENT_LOG_LEN {
            self.log.pop_front();
        }
        self.log.push_back(event);
    }

    /// Flip the latch for `key`, returning whether it is now held
    pub fn toggle_held(&mut self, key: u8) -> bool {
        let slot = &mut self.held[key as usize & 0x7F];
        *slot = !*slot;
        *slot
    }

    /// Clear every latch, returning the keys that were held
    pub fn take_held(&mut self) -> Vec<u8> {
        let keys = (0u8..128).filter(|&k| self.held[k as usize]).collect();
        self.held = [false; 128];
        keys
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// MIDI note for a key on the computer keyboard piano row
pub fn keyboard_note(c: char) -> Option<u8> {
    KEYBOARD_LAYOUT
        .iter()
        .position(|&k| k == c)
        .map(|offset| KEYBOARD_BASE_NOTE + offset as u8)
}

/// First `preset-N` name, counting up from `start`, with no file in `dir`
pub fn free_preset_name(dir: &Path, start: usize) -> String {
    (start.max(1)..)
        .map(|n| format!("preset-{n}"))
        .find(|name| !dir.join(format!("{name}.{PRESET_EXTENSION}")).exists())
        .unwrap_or_else(|| "preset".to_string())
}
