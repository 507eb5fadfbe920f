//! App - builder that wires the store, the audio stream and the TUI together

use std::{
    fs,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info, warn};
use rtrb::RingBuffer;

use additive_midi::{
    io::midi::{MidiEvent, TimedEvent},
    preset::{restore_state, save_state, PresetLibrary},
    processor::{AdditiveMidi, ProcessorConfig},
    store::ProfileState,
    MAX_BLOCK_EVENTS,
};

use super::ui::UiApp;

/// Session state saved on exit and restored on start, inside the preset dir.
const SESSION_FILE: &str = "session.state";
/// Notes queued from the keyboard to the audio thread.
const NOTE_QUEUE_SIZE: usize = 256;
/// Expanded events queued from the audio thread to the event log.
const DISPLAY_QUEUE_SIZE: usize = 4096;

/// Main application builder
pub struct App {
    preset_dir: PathBuf,
    config: ProcessorConfig,
}

impl App {
    /// Create an app using `./presets` and the default processor sizing
    pub fn new() -> Self {
        Self {
            preset_dir: PathBuf::from("presets"),
            config: ProcessorConfig::default(),
        }
    }

    /// Directory presets are browsed from and saved to
    pub fn preset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.preset_dir = dir.into();
        self
    }

    /// Run the application (takes over the terminal until quit)
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;
        info!(
            "output: {} Hz, {} channels",
            config.sample_rate().0,
            config.channels()
        );

        let (mut processor, mut store) = AdditiveMidi::new(self.config);
        let library = PresetLibrary::open(&self.preset_dir).wrap_err_with(|| {
            format!("failed to open preset directory {}", self.preset_dir.display())
        })?;

        let session_path = self.preset_dir.join(SESSION_FILE);
        if let Ok(bytes) = fs::read(&session_path) {
            match restore_state(&mut store, &bytes) {
                Ok(()) => info!("restored session from {}", session_path.display()),
                Err(err) => warn!("ignoring session {}: {err}", session_path.display()),
            }
        }

        let dirty = Arc::new(AtomicBool::new(false));
        let flag = dirty.clone();
        store.subscribe(move |_: &ProfileState| flag.store(true, Ordering::Relaxed));

        let (note_tx, mut note_rx) = RingBuffer::<MidiEvent>::new(NOTE_QUEUE_SIZE);
        let (mut display_tx, display_rx) = RingBuffer::<TimedEvent>::new(DISPLAY_QUEUE_SIZE);

        // Everything below runs on the audio thread: no locks, no allocation
        let mut block = Vec::with_capacity(MAX_BLOCK_EVENTS);
        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                block.clear();
                while block.len() < MAX_BLOCK_EVENTS {
                    match note_rx.pop() {
                        Ok(event) => block.push(TimedEvent::new(0, event)),
                        Err(_) => break,
                    }
                }

                for &event in processor.process_midi(&block) {
                    // The log is cosmetic; drop entries if the UI falls behind
                    let _ = display_tx.push(event);
                }

                // MIDI effect: nothing to synthesize
                data.fill(0.0);
            },
            |err| error!("audio stream error: {err}"),
            None,
        )?;
        stream.play()?;

        let mut terminal = ratatui::init();
        let mut ui = UiApp::new(store, library, note_tx, display_rx, dirty.clone());
        let result = ui.run(&mut terminal);
        ratatui::restore();

        if dirty.load(Ordering::Relaxed) {
            let bytes = save_state(ui.store())?;
            fs::write(&session_path, bytes)
                .wrap_err_with(|| format!("failed to save session {}", session_path.display()))?;
            info!("saved session to {}", session_path.display());
        }

        result
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
