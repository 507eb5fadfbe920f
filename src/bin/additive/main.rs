//! additive - terminal front end for the harmonic MIDI expander
//!
//! Run with: cargo run --bin additive
//!
//! Logs go to `additive.log` in the system temp directory; set `RUST_LOG` to
//! change the level.

mod app;
mod ui;

use std::fs::File;

use app::App;
use color_eyre::eyre::{Result as EyreResult, WrapErr};

/// Environment variable that overrides the preset directory.
const PRESET_DIR_VAR: &str = "ADDITIVE_MIDI_PRESETS";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    let mut app = App::new();
    if let Some(dir) = std::env::var_os(PRESET_DIR_VAR) {
        app = app.preset_dir(dir);
    }
    app.run()
}

fn init_logging() -> EyreResult<()> {
    let path = std::env::temp_dir().join("additive.log");
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
