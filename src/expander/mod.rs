use crate::{
    harmonic::{harmonic_note, harmonic_velocity, HarmonicProfile, NUM_HARMONICS},
    io::midi::{MidiEvent, TimedEvent},
    store::ComboSource,
    MAX_BLOCK_EVENTS,
};

/*
Harmonic Expansion
==================

Each incoming event is copied to the output first, then followed by the
events it spawns, all at the same sample offset:

  NoteOn  n, v   →  NoteOn n, v
                    NoteOn n + semis[i], round(v * combo[i])   for combo[i] > 0

  NoteOff n      →  NoteOff n
                    NoteOff n + semis[i]                       for all 8 i

  anything else  →  itself

Harmonics that would land above note 127 are dropped.

The expander keeps no record of which harmonics it started. Releases cover
all eight harmonics no matter what the combo says right now, so a harmonic
that was switched on at note-on time is always switched off again even if its
strength has since dropped to zero. A note-off for a note that never sounded
is harmless.

Expansion is order-preserving: the output is the input with companions
spliced in after their origin, not a re-sort by timestamp.
*/

/// Destination for expanded events.
pub trait EventSink {
    fn emit(&mut self, event: TimedEvent);
}

impl EventSink for Vec<TimedEvent> {
    #[inline]
    fn emit(&mut self, event: TimedEvent) {
        self.push(event);
    }
}

/// Expand one event against a combo snapshot.
pub fn expand_event<S: EventSink>(event: TimedEvent, combo: &HarmonicProfile, sink: &mut S) {
    sink.emit(event);

    let timing = event.timing;
    match event.event {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if velocity > 0 => {
            for (index, &strength) in combo.strengths().iter().enumerate() {
                if strength <= 0.0 {
                    continue;
                }
                if let Some(note) = harmonic_note(key, index) {
                    sink.emit(TimedEvent::note_on(
                        timing,
                        channel,
                        note,
                        harmonic_velocity(velocity, strength),
                    ));
                }
            }
        }
        MidiEvent::NoteOn { channel, key, .. } | MidiEvent::NoteOff { channel, key, .. } => {
            for index in 0..NUM_HARMONICS {
                if let Some(note) = harmonic_note(key, index) {
                    sink.emit(TimedEvent::note_off(timing, channel, note));
                }
            }
        }
        _ => {}
    }
}

/// Block-level expander for the audio thread.
///
/// Reads one combo snapshot per block from its [`ComboSource`] and writes into
/// an output buffer sized up front, so steady-state processing never
/// allocates.
pub struct HarmonicExpander<S: ComboSource> {
    source: S,
    output: Vec<TimedEvent>,
}

impl<S: ComboSource> HarmonicExpander<S> {
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, MAX_BLOCK_EVENTS)
    }

    /// Pre-size for up to `max_block_events` inputs, each expanding to at
    /// most one original plus one event per harmonic.
    pub fn with_capacity(source: S, max_block_events: usize) -> Self {
        Self {
            source,
            output: Vec::with_capacity(max_block_events * (NUM_HARMONICS + 1)),
        }
    }

    /// Expand a whole block. The returned slice is valid until the next call.
    ///
    /// A block larger than the configured capacity grows the buffer rather
    /// than dropping events; a dropped note-off would hang a note.
    pub fn process_block(&mut self, input: &[TimedEvent]) -> &[TimedEvent] {
        let combo = self.source.latest();
        self.output.clear();
        for &event in input {
            expand_event(event, &combo, &mut self.output);
        }
        &self.output
    }

    pub fn capacity(&self) -> usize {
        self.output.capacity()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(values: [f32; NUM_HARMONICS]) -> HarmonicProfile {
        HarmonicProfile::new(values)
    }

    fn expand(event: TimedEvent, combo: &HarmonicProfile) -> Vec<TimedEvent> {
        let mut out = Vec::new();
        expand_event(event, combo, &mut out);
        out
    }

    #[test]
    fn test_octave_only() {
        let out = expand(
            TimedEvent::note_on(0, 1, 60, 100),
            &combo([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        );
        assert_eq!(
            out,
            vec![
                TimedEvent::note_on(0, 1, 60, 100),
                TimedEvent::note_on(0, 1, 72, 100),
            ]
        );
    }

    #[test]
    fn test_note_on_count_matches_active_harmonics() {
        let profile = combo([0.5, 0.0, 0.25, 0.0, 1.0, 0.0, 0.0, 0.1]);
        let out = expand(TimedEvent::note_on(17, 3, 40, 80), &profile);

        assert_eq!(out.len(), 1 + profile.active_count());
        assert!(out.iter().all(|e| e.timing == 17));
        let keys: Vec<u8> = out
            .iter()
            .map(|e| match e.event {
                MidiEvent::NoteOn { key, .. } => key,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(keys, vec![40, 52, 64, 71, 78]);
    }

    #[test]
    fn test_note_on_velocities() {
        let out = expand(
            TimedEvent::note_on(0, 1, 48, 100),
            &combo([0.5, 0.001, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        );
        assert_eq!(out[1], TimedEvent::note_on(0, 1, 60, 50));
        // Tiny strengths still sound at velocity 1
        assert_eq!(out[2], TimedEvent::note_on(0, 1, 67, 1));
    }

    #[test]
    fn test_silent_combo_only_passes_note_on() {
        let out = expand(TimedEvent::note_on(5, 1, 60, 100), &HarmonicProfile::silent());
        assert_eq!(out, vec![TimedEvent::note_on(5, 1, 60, 100)]);
    }

    #[test]
    fn test_note_off_ignores_combo() {
        let off = TimedEvent::note_off(9, 2, 60);
        let silent = expand(off, &HarmonicProfile::silent());
        let full = expand(off, &combo([1.0; NUM_HARMONICS]));

        assert_eq!(silent.len(), 9);
        assert_eq!(silent, full);
        assert_eq!(silent[0], off);
        let keys: Vec<u8> = silent[1..]
            .iter()
            .map(|e| match e.event {
                MidiEvent::NoteOff { key, velocity, .. } => {
                    assert_eq!(velocity, 0);
                    key
                }
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(keys, vec![72, 79, 84, 88, 91, 94, 96, 98]);
    }

    #[test]
    fn test_high_notes_drop_harmonics() {
        // 100 + 28 = 128 is the first to drop
        let on = expand(TimedEvent::note_on(0, 1, 100, 90), &combo([1.0; NUM_HARMONICS]));
        assert_eq!(on.len(), 1 + 3);
        let off = expand(TimedEvent::note_off(0, 1, 100), &HarmonicProfile::silent());
        assert_eq!(off.len(), 1 + 3);

        let top = expand(TimedEvent::note_off(0, 1, 127), &HarmonicProfile::silent());
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn test_zero_velocity_note_on_releases() {
        let release = TimedEvent::note_on(4, 1, 60, 0);
        let out = expand(release, &HarmonicProfile::silent());

        assert_eq!(out.len(), 9);
        assert_eq!(out[0], release);
        assert_eq!(out[1], TimedEvent::note_off(4, 1, 72));
    }

    #[test]
    fn test_other_events_pass_alone() {
        let bend = TimedEvent::new(
            3,
            MidiEvent::PitchBend {
                channel: 1,
                value: 100,
            },
        );
        let cc = TimedEvent::new(
            3,
            MidiEvent::ControlChange {
                channel: 1,
                controller: 7,
                value: 90,
            },
        );
        let full = combo([1.0; NUM_HARMONICS]);
        assert_eq!(expand(bend, &full), vec![bend]);
        assert_eq!(expand(cc, &full), vec![cc]);
    }

    #[test]
    fn test_block_preserves_order() {
        let profile = combo([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let mut expander = HarmonicExpander::with_capacity(profile, 4);
        let cc = TimedEvent::new(
            2,
            MidiEvent::ControlChange {
                channel: 1,
                controller: 1,
                value: 10,
            },
        );
        let input = [
            TimedEvent::note_on(0, 1, 60, 100),
            cc,
            TimedEvent::note_off(8, 1, 60),
        ];

        let out = expander.process_block(&input);
        assert_eq!(out.len(), 2 + 1 + 9);
        assert_eq!(out[0], input[0]);
        assert_eq!(out[1], TimedEvent::note_on(0, 1, 72, 100));
        assert_eq!(out[2], cc);
        assert_eq!(out[3], input[2]);
        assert!(out.windows(2).all(|w| w[0].timing <= w[1].timing));
    }

    #[test]
    fn test_block_output_is_reused() {
        let mut expander = HarmonicExpander::with_capacity(HarmonicProfile::silent(), 8);
        let capacity = expander.capacity();

        let first = expander.process_block(&[TimedEvent::note_off(0, 1, 60)]).len();
        let second = expander.process_block(&[TimedEvent::note_on(0, 1, 60, 10)]).len();

        assert_eq!(first, 9);
        assert_eq!(second, 1);
        assert_eq!(expander.capacity(), capacity);
    }
}
