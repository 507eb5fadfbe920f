//! Harmonic profile store.
//!
//! The store lives on the control (UI) thread. It owns the two editable
//! profiles and the morph amount, keeps the derived combo profile in sync, and
//! hands every new combo to the audio thread through [`publish`].
//!
//! ```text
//!   UI ──set_value/set_morph/replace_all──▶ ProfileStore ──observers──▶ UI
//!                                               │
//!                                          ComboPublisher
//!                                               │ (rtrb, lock-free)
//!                                          ComboReader ──▶ HarmonicExpander
//! ```

pub mod publish;

use log::{trace, warn};

use crate::harmonic::{profile::clamp_unit, HarmonicProfile, NUM_HARMONICS};

pub use publish::{combo_channel, ComboPublisher, ComboReader, ComboSource};

/// Morph amount a fresh store starts at.
pub const DEFAULT_MORPH: f32 = 0.5;

/// Which editable profile a setter addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSlot {
    Harm1,
    Harm2,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("harmonic index {index} out of range (expected 0..8)")]
    OutOfRange { index: usize },
    #[error("invalid profile data: {reason}")]
    InvalidData { reason: String },
}

/// Complete store contents at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileState {
    pub harm1: HarmonicProfile,
    pub harm2: HarmonicProfile,
    pub morph: f32,
    pub combo: HarmonicProfile,
}

impl Default for ProfileState {
    fn default() -> Self {
        let harm1 = HarmonicProfile::default_ramp();
        let harm2 = HarmonicProfile::default_ramp();
        Self {
            harm1,
            harm2,
            morph: DEFAULT_MORPH,
            combo: HarmonicProfile::morph(&harm1, &harm2, DEFAULT_MORPH),
        }
    }
}

/// Called after every mutation of the store.
///
/// Runs on the thread that mutated the store; implementations should hand
/// work off rather than block (redraw flags, channels).
pub trait ProfileObserver: Send {
    fn profile_changed(&mut self, state: &ProfileState);
}

impl<F> ProfileObserver for F
where
    F: FnMut(&ProfileState) + Send,
{
    fn profile_changed(&mut self, state: &ProfileState) {
        self(state)
    }
}

pub struct ProfileStore {
    state: ProfileState,
    publisher: ComboPublisher,
    observers: Vec<Box<dyn ProfileObserver>>,
}

impl ProfileStore {
    /// Create a store with the default profiles and publish its first combo.
    pub fn new(publisher: ComboPublisher) -> Self {
        let mut store = Self {
            state: ProfileState::default(),
            publisher,
            observers: Vec::new(),
        };
        store.publish();
        store
    }

    /// Create a store together with the reader for the audio thread.
    pub fn with_reader(capacity: usize) -> (Self, ComboReader) {
        let (publisher, reader) = combo_channel(capacity);
        (Self::new(publisher), reader)
    }

    pub fn subscribe(&mut self, observer: impl ProfileObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Write one strength of `slot`, clamped into [0, 1].
    pub fn set_value(
        &mut self,
        slot: ProfileSlot,
        index: usize,
        value: f32,
    ) -> Result<(), ProfileError> {
        let profile = match slot {
            ProfileSlot::Harm1 => &mut self.state.harm1,
            ProfileSlot::Harm2 => &mut self.state.harm2,
        };
        if !profile.set(index, value) {
            return Err(ProfileError::OutOfRange { index });
        }
        trace!("{:?}[{}] = {}", slot, index, profile.get(index).unwrap_or_default());
        self.changed();
        Ok(())
    }

    /// Set the morph amount, clamped into [0, 1].
    pub fn set_morph(&mut self, value: f32) {
        self.state.morph = clamp_unit(value);
        trace!("morph = {}", self.state.morph);
        self.changed();
    }

    /// Replace both profiles and the morph amount in one step.
    ///
    /// Either profile having other than eight values rejects the whole call
    /// and leaves the store untouched.
    pub fn replace_all(
        &mut self,
        harm1: &[f32],
        harm2: &[f32],
        morph: f32,
    ) -> Result<(), ProfileError> {
        let harm1 = to_profile("harm1", harm1)?;
        let harm2 = to_profile("harm2", harm2)?;

        self.state.harm1 = harm1;
        self.state.harm2 = harm2;
        self.state.morph = clamp_unit(morph);
        trace!("replaced profiles, morph = {}", self.state.morph);
        self.changed();
        Ok(())
    }

    /// Current combo by value.
    pub fn combo(&self) -> HarmonicProfile {
        self.state.combo
    }

    pub fn profile(&self, slot: ProfileSlot) -> HarmonicProfile {
        match slot {
            ProfileSlot::Harm1 => self.state.harm1,
            ProfileSlot::Harm2 => self.state.harm2,
        }
    }

    pub fn morph(&self) -> f32 {
        self.state.morph
    }

    pub fn state(&self) -> ProfileState {
        self.state
    }

    /// Retry a combo snapshot the audio ring had no room for.
    pub fn flush(&mut self) -> bool {
        self.publisher.flush()
    }

    fn changed(&mut self) {
        self.state.combo =
            HarmonicProfile::morph(&self.state.harm1, &self.state.harm2, self.state.morph);
        self.publish();

        let state = self.state;
        for observer in &mut self.observers {
            observer.profile_changed(&state);
        }
    }

    fn publish(&mut self) {
        if !self.publisher.publish(self.state.combo) {
            warn!("combo queue full, audio thread will pick up the change on the next flush");
        }
    }
}

fn to_profile(name: &str, values: &[f32]) -> Result<HarmonicProfile, ProfileError> {
    HarmonicProfile::try_from(values).map_err(|len| ProfileError::InvalidData {
        reason: format!("{name} has {len} values, expected {NUM_HARMONICS}"),
    })
}
