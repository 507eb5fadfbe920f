use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::harmonic::HarmonicProfile;

/// Create the single-producer/single-consumer channel that carries combo
/// snapshots from the control thread to the audio thread.
pub fn combo_channel(capacity: usize) -> (ComboPublisher, ComboReader) {
    let (tx, rx) = RingBuffer::<HarmonicProfile>::new(capacity.max(1));
    (
        ComboPublisher { tx, pending: None },
        ComboReader {
            rx,
            current: HarmonicProfile::default(),
        },
    )
}

/// Control-side half of the combo channel.
pub struct ComboPublisher {
    tx: Producer<HarmonicProfile>,
    // Newest snapshot that did not fit; superseded by any later publish.
    pending: Option<HarmonicProfile>,
}

impl ComboPublisher {
    /// Queue `combo` for the audio thread.
    ///
    /// Returns `false` when the ring is full. The snapshot is then held back
    /// and retried by the next `publish` or `flush`.
    pub fn publish(&mut self, combo: HarmonicProfile) -> bool {
        match self.tx.push(combo) {
            Ok(()) => {
                self.pending = None;
                true
            }
            Err(PushError::Full(combo)) => {
                self.pending = Some(combo);
                false
            }
        }
    }

    /// Retry a held-back snapshot. Returns `true` when nothing is left pending.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(combo) => self.publish(combo),
            None => true,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The audio side has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_abandoned()
    }
}

/// Anything the expander can read a combo profile from once per block.
pub trait ComboSource: Send {
    fn latest(&mut self) -> HarmonicProfile;
}

/// Audio-side half of the combo channel.
pub struct ComboReader {
    rx: Consumer<HarmonicProfile>,
    current: HarmonicProfile,
}

impl ComboReader {
    /// Last combo seen, without draining the ring.
    pub fn current(&self) -> &HarmonicProfile {
        &self.current
    }
}

impl ComboSource for ComboReader {
    /// Drain every queued snapshot and keep the newest. Never blocks.
    fn latest(&mut self) -> HarmonicProfile {
        while let Ok(combo) = self.rx.pop() {
            self.current = combo;
        }
        self.current
    }
}

/// A fixed profile, for offline rendering and tests.
impl ComboSource for HarmonicProfile {
    fn latest(&mut self) -> HarmonicProfile {
        *self
    }
}
