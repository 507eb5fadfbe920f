//! Expand a C major chord under three morph settings and print the output.
//!
//! Run with: cargo run --example expand_chord

use additive_midi::{
    io::{
        converter::encode,
        midi::{MidiEvent, TimedEvent},
    },
    processor::{AdditiveMidi, ProcessorConfig},
};

fn describe(event: &TimedEvent) -> String {
    let (bytes, len) = encode(&event.event);
    let hex: Vec<String> = bytes[..len].iter().map(|b| format!("{b:02X}")).collect();
    let kind = match event.event {
        MidiEvent::NoteOn { velocity, .. } if velocity > 0 => "on ",
        MidiEvent::NoteOn { .. } | MidiEvent::NoteOff { .. } => "off",
        _ => "   ",
    };
    format!("  t={:<4} {} {}", event.timing, kind, hex.join(" "))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let (mut processor, mut store) = AdditiveMidi::new(ProcessorConfig::default());

    // Bright: octave and fifth only. Dark: everything above the fifth.
    let bright = [1.0, 0.6, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let dark = [0.0, 0.0, 0.5, 0.4, 0.3, 0.2, 0.15, 0.1];

    let chord = [
        TimedEvent::note_on(0, 1, 60, 100),
        TimedEvent::note_on(0, 1, 64, 90),
        TimedEvent::note_on(0, 1, 67, 80),
        TimedEvent::note_off(256, 1, 60),
        TimedEvent::note_off(256, 1, 64),
        TimedEvent::note_off(256, 1, 67),
    ];

    for morph in [0.0, 0.5, 1.0] {
        store.replace_all(&bright, &dark, morph)?;
        println!("morph {morph:.1}, combo {:?}", store.combo().strengths());

        let out = processor.process_midi(&chord);
        for event in out {
            println!("{}", describe(event));
        }
        println!("  {} events in, {} out\n", chord.len(), out.len());
    }

    Ok(())
}
