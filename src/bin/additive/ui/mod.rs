//! TUI module for additive
//!
//! Edits the two harmonic profiles and the morph amount, browses presets, and
//! plays notes from the computer keyboard so the expansion can be watched in
//! the output log.

mod events;
mod profiles;
mod state;

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::warn;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};

use additive_midi::{
    io::midi::{MidiEvent, TimedEvent},
    preset::{PresetData, PresetError, PresetLibrary},
    processor::AdditiveMidi,
    store::{ProfileSlot, ProfileStore},
};

use events::render_events;
use profiles::{render_morph, render_profile};
use state::{free_preset_name, keyboard_note, Focus, UiState};

/// Step applied by Up/Down to a strength or the morph amount
const VALUE_STEP: f32 = 0.05;
/// Channel and velocity of notes played from the keyboard
const KEYBOARD_CHANNEL: u8 = 1;
const KEYBOARD_VELOCITY: u8 = 100;

/// UI application state
pub struct UiApp {
    store: ProfileStore,
    library: PresetLibrary,
    /// Notes for the audio thread
    note_tx: Producer<MidiEvent>,
    /// Expanded output from the audio thread
    events_rx: Consumer<TimedEvent>,
    /// Set by the store whenever anything changes
    dirty: Arc<AtomicBool>,
    state: UiState,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        store: ProfileStore,
        library: PresetLibrary,
        note_tx: Producer<MidiEvent>,
        events_rx: Consumer<TimedEvent>,
        dirty: Arc<AtomicBool>,
    ) -> Self {
        let mut state = UiState::new();
        state.set_status(format!(
            "{} presets in {}",
            library.files().len(),
            library.dir().display()
        ));
        Self {
            store,
            library,
            note_tx,
            events_rx,
            dirty,
            state,
            should_quit: false,
        }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_events();
            // Retry a combo the audio thread had no room for
            self.store.flush();

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.release_all();
        Ok(())
    }

    fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.pop() {
            self.state.push_event(event);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => self.state.focus = self.state.focus.next(),
            KeyCode::BackTab => self.state.focus = self.state.focus.prev(),
            KeyCode::Left if self.state.focus == Focus::Morph => self.nudge(-VALUE_STEP),
            KeyCode::Right if self.state.focus == Focus::Morph => self.nudge(VALUE_STEP),
            KeyCode::Left => self.state.select_left(),
            KeyCode::Right => self.state.select_right(),
            KeyCode::Up => self.nudge(VALUE_STEP),
            KeyCode::Down => self.nudge(-VALUE_STEP),
            KeyCode::Char('[') => {
                let result = self.library.prev();
                self.load_preset(result);
            }
            KeyCode::Char(']') => {
                let result = self.library.next();
                self.load_preset(result);
            }
            KeyCode::Char('p') => self.save_preset(),
            KeyCode::Char(' ') => self.release_all(),
            KeyCode::Char(c) => {
                if let Some(note) = keyboard_note(c) {
                    self.toggle_note(note);
                }
            }
            _ => {}
        }
    }

    /// Move the focused value by `delta`
    fn nudge(&mut self, delta: f32) {
        match self.state.focus.slot() {
            Some(slot) => {
                let index = self.state.selected;
                let current = self.store.profile(slot).get(index).unwrap_or_default();
                if let Err(err) = self.store.set_value(slot, index, current + delta) {
                    self.state.set_status(err.to_string());
                }
            }
            None => self.store.set_morph(self.store.morph() + delta),
        }
    }

    fn load_preset(&mut self, result: Result<PresetData, PresetError>) {
        let status = match result {
            Ok(preset) => match self.store.apply_preset(&preset) {
                Ok(()) => format!(
                    "loaded {}",
                    self.library.current_name().unwrap_or_default()
                ),
                Err(err) => err.to_string(),
            },
            Err(err) => {
                warn!("preset load failed: {err}");
                err.to_string()
            }
        };
        self.state.set_status(status);
    }

    fn save_preset(&mut self) {
        let name = free_preset_name(self.library.dir(), self.library.files().len() + 1);
        let status = match self.library.save(&name, &self.store.preset()) {
            Ok(path) => format!("saved {}", path.display()),
            Err(err) => {
                warn!("preset save failed: {err}");
                err.to_string()
            }
        };
        self.state.set_status(status);
    }

    fn toggle_note(&mut self, key: u8) {
        let event = if self.state.toggle_held(key) {
            MidiEvent::NoteOn {
                channel: KEYBOARD_CHANNEL,
                key,
                velocity: KEYBOARD_VELOCITY,
            }
        } else {
            MidiEvent::NoteOff {
                channel: KEYBOARD_CHANNEL,
                key,
                velocity: 0,
            }
        };
        self.send(event);
    }

    fn release_all(&mut self) {
        for key in self.state.take_held() {
            self.send(MidiEvent::NoteOff {
                channel: KEYBOARD_CHANNEL,
                key,
                velocity: 0,
            });
        }
    }

    fn send(&mut self, event: MidiEvent) {
        if self.note_tx.push(event).is_err() {
            self.state.set_status("note queue full");
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Title bar
                Constraint::Length(10), // Profiles
                Constraint::Length(3),  // Morph
                Constraint::Min(6),     // Output log
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        self.render_title(frame, chunks[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(chunks[1]);

        let selected = |slot: ProfileSlot| {
            (self.state.focus.slot() == Some(slot)).then_some(self.state.selected)
        };
        render_profile(
            frame,
            columns[0],
            "Harm 1",
            &self.store.profile(ProfileSlot::Harm1),
            selected(ProfileSlot::Harm1),
        );
        render_profile(
            frame,
            columns[1],
            "Harm 2",
            &self.store.profile(ProfileSlot::Harm2),
            selected(ProfileSlot::Harm2),
        );
        render_profile(frame, columns[2], "Combo", &self.store.combo(), None);

        render_morph(
            frame,
            chunks[2],
            self.store.morph(),
            self.state.focus == Focus::Morph,
        );
        render_events(frame, chunks[3], &self.state.log);

        let help = Paragraph::new(concat!(
            " [Q] Quit  [Tab] Focus  [←→↑↓] Edit  [ [ ] ] Presets",
            "  [P] Save  [Z..,] Notes  [Space] Release",
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let preset = self
            .library
            .current_name()
            .unwrap_or_else(|| "(no preset)".to_string());
        let held = self.state.held.iter().filter(|&&h| h).count();
        let modified = if self.dirty.load(Ordering::Relaxed) { " *" } else { "" };

        let line = Line::from(vec![
            Span::styled(
                format!(" {}{}  ", preset, modified),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("held: {}  ", held),
                Style::default().fg(Color::Green),
            ),
            Span::styled(self.state.status.clone(), Style::default().fg(Color::DarkGray)),
        ]);

        let block = Block::default()
            .title(format!(" {} ", AdditiveMidi::NAME))
            .borders(Borders::ALL);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
