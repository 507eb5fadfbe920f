/// Channel-voice MIDI message. Channels are numbered 1-16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    PolyPressure { channel: u8, key: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    PitchBend { channel: u8, value: i16 },
    /// Any other short message (system common, realtime), kept as raw bytes.
    Other { bytes: [u8; 3], len: u8 },
}

impl MidiEvent {
    /// A note-on with a non-zero velocity.
    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self, MidiEvent::NoteOn { velocity, .. } if *velocity > 0)
    }

    /// A note-off, or a note-on with velocity 0 (running-status release).
    #[inline]
    pub fn is_note_off(&self) -> bool {
        matches!(
            self,
            MidiEvent::NoteOff { .. } | MidiEvent::NoteOn { velocity: 0, .. }
        )
    }

    pub fn channel(&self) -> Option<u8> {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::PolyPressure { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::ProgramChange { channel, .. }
            | MidiEvent::ChannelPressure { channel, .. }
            | MidiEvent::PitchBend { channel, .. } => Some(channel),
            MidiEvent::Other { .. } => None,
        }
    }
}

/// A MIDI event at a sample offset within the current processing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub timing: u32,
    pub event: MidiEvent,
}

impl TimedEvent {
    pub fn new(timing: u32, event: MidiEvent) -> Self {
        Self { timing, event }
    }

    pub fn note_on(timing: u32, channel: u8, key: u8, velocity: u8) -> Self {
        Self::new(
            timing,
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            },
        )
    }

    pub fn note_off(timing: u32, channel: u8, key: u8) -> Self {
        Self::new(
            timing,
            MidiEvent::NoteOff {
                channel,
                key,
                velocity: 0,
            },
        )
    }
}
