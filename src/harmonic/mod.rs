use once_cell::sync::Lazy;

/*
Harmonic Intervals
==================

Every note played into the plugin is a fundamental. Its overtones sit at whole
number multiples of the fundamental frequency: 2x is the octave, 3x an octave
and a fifth, 4x two octaves, and so on. We voice the 2nd through 9th harmonic
as extra MIDI notes, so each of the 8 slots in a profile maps to one ratio.

Vocabulary
----------

  index      Slot in a profile, 0..8. Index 0 is the 2nd harmonic.

  ratio      Frequency multiple of the fundamental: ratio = index + 2.

  semitones  Equal-tempered distance of that ratio above the fundamental,
             rounded to the nearest key: round(12 * log2(ratio)).

  strength   Profile value in [0, 1] that scales the note velocity.


The Table
---------

  index   ratio   12*log2(ratio)   semitones
    0       2        12.000            12
    1       3        19.020            19
    2       4        24.000            24
    3       5        27.863            28
    4       6        31.020            31
    5       7        33.688            34
    6       8        36.000            36
    7       9        38.039            38

Rounding is half away from zero (`f64::round`). None of the ratios above land
on a .5 boundary, but the rule stays fixed should the harmonic range grow.

The table is a pure function of the ratio, so it is computed once on first use
and shared by every expander.
*/

pub mod profile;

pub use profile::HarmonicProfile;

/// Number of harmonic slots in a profile (2nd through 9th harmonic).
pub const NUM_HARMONICS: usize = 8;

/// Highest valid MIDI note or velocity.
pub const MIDI_MAX: u8 = 127;

/// Semitone offsets above the fundamental for each harmonic index.
pub static SEMITONE_TABLE: Lazy<[u8; NUM_HARMONICS]> = Lazy::new(|| {
    let mut table = [0u8; NUM_HARMONICS];
    for (index, offset) in table.iter_mut().enumerate() {
        *offset = ratio_to_semitones(harmonic_ratio(index)) as u8;
    }
    table
});

/// Frequency ratio of the harmonic stored at `index`.
#[inline]
pub fn harmonic_ratio(index: usize) -> f64 {
    (index + 2) as f64
}

/// Convert a frequency ratio to the nearest equal-tempered semitone distance.
///
/// Ties round away from zero.
pub fn ratio_to_semitones(ratio: f64) -> i32 {
    (12.0 * ratio.log2()).round() as i32
}

/// Note number of harmonic `index` above `base`, or `None` past note 127.
///
/// Out-of-range harmonics are dropped, never clamped or wrapped.
#[inline]
pub fn harmonic_note(base: u8, index: usize) -> Option<u8> {
    let note = base as u16 + SEMITONE_TABLE[index] as u16;
    if note <= MIDI_MAX as u16 {
        Some(note as u8)
    } else {
        None
    }
}

/// Velocity for a harmonic with the given strength.
///
/// Floors at 1 so that any strength that passed the `> 0` test stays audible.
#[inline]
pub fn harmonic_velocity(velocity: u8, strength: f32) -> u8 {
    let scaled = (velocity as f32 * strength).round();
    scaled.clamp(1.0, MIDI_MAX as f32) as u8
}
