//! Plugin core as seen by an audio host.
//!
//! [`AdditiveMidi`] is the realtime half of the plugin: the host calls it once
//! per block with audio and timestamped MIDI, it passes the audio through and
//! returns the harmonically expanded MIDI. Its control-side partner is the
//! [`ProfileStore`] returned alongside it.

use crate::{
    expander::HarmonicExpander,
    io::{midi::TimedEvent, pass_through, AudioInput, AudioOutput},
    store::{ComboReader, ProfileStore},
    DEFAULT_QUEUE_CAPACITY, MAX_BLOCK_EVENTS,
};

/// Sizing for the realtime side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Input MIDI events per block the output buffer is sized for.
    pub max_block_events: usize,
    /// Combo snapshots that can queue between two blocks.
    pub queue_capacity: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_block_events: MAX_BLOCK_EVENTS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

pub struct AdditiveMidi {
    expander: HarmonicExpander<ComboReader>,
}

impl AdditiveMidi {
    pub const NAME: &'static str = "Additive Midi";
    pub const ACCEPTS_MIDI: bool = true;
    pub const PRODUCES_MIDI: bool = true;
    pub const TAIL_LENGTH_SECONDS: f64 = 0.0;

    /// Build the processor and the store that controls it.
    ///
    /// The processor goes to the audio thread, the store stays with the UI.
    pub fn new(config: ProcessorConfig) -> (Self, ProfileStore) {
        let (store, reader) = ProfileStore::with_reader(config.queue_capacity);
        let processor = Self {
            expander: HarmonicExpander::with_capacity(reader, config.max_block_events),
        };
        (processor, store)
    }

    /// Process one host block: audio passes through, MIDI is expanded.
    pub fn process_block(
        &mut self,
        audio_in: &AudioInput,
        audio_out: &mut AudioOutput,
        midi: &[TimedEvent],
    ) -> &[TimedEvent] {
        pass_through(audio_in, audio_out);
        self.process_midi(midi)
    }

    /// MIDI-only processing for hosts without an audio bus.
    pub fn process_midi(&mut self, midi: &[TimedEvent]) -> &[TimedEvent] {
        self.expander.process_block(midi)
    }
}
