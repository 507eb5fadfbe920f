pub mod expander; // Per-block harmonic expansion of MIDI streams
pub mod harmonic; // Harmonic ratios, semitone table, strength profiles
pub mod io;
#[cfg(feature = "preset")]
pub mod preset; // Preset files and host state blobs
pub mod processor; // Plugin core driven by the host audio thread
pub mod store; // Profile store and cross-thread combo publication

/// Upper bound on input events expected in a single processing block.
pub const MAX_BLOCK_EVENTS: usize = 512;
/// Default number of combo snapshots the publication ring can hold.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;
