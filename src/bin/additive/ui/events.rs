//! Event log widget - the most recent expanded MIDI, newest at the bottom

use std::collections::VecDeque;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use additive_midi::io::midi::{MidiEvent, TimedEvent};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Note name with octave, middle C (60) is C4
pub fn note_name(key: u8) -> String {
    let octave = i32::from(key / 12) - 1;
    format!("{}{}", NOTE_NAMES[usize::from(key % 12)], octave)
}

fn describe(event: &MidiEvent) -> (String, Color) {
    match *event {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if velocity > 0 => (
            format!(
                "on   ch{:<2} {:>4} ({:>3})  vel {:>3}",
                channel,
                note_name(key),
                key,
                velocity
            ),
            Color::Green,
        ),
        MidiEvent::NoteOn { channel, key, .. } | MidiEvent::NoteOff { channel, key, .. } => (
            format!("off  ch{:<2} {:>4} ({:>3})", channel, note_name(key), key),
            Color::Red,
        ),
        other => (format!("{:?}", other), Color::DarkGray),
    }
}

pub fn render_events(frame: &mut Frame, area: Rect, log: &VecDeque<TimedEvent>) {
    let block = Block::default().title(" Output MIDI ").borders(Borders::ALL);
    let visible = block.inner(area).height as usize;

    let lines: Vec<Line> = log
        .iter()
        .skip(log.len().saturating_sub(visible))
        .map(|timed| {
            let (text, color) = describe(&timed.event);
            Line::from(vec![
                Span::styled(
                    format!("{:>5} ", timed.timing),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(text, Style::default().fg(color)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
