use super::NUM_HARMONICS;

/// Clamp a strength or morph value into [0, 1].
///
/// NaN has no meaningful position on the scale and becomes 0.
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Eight harmonic strengths, one per ratio 2..=9, each in [0, 1].
///
/// `Copy` so the audio thread can hold a whole snapshot without allocating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicProfile {
    strengths: [f32; NUM_HARMONICS],
}

impl HarmonicProfile {
    /// Build a profile, clamping every value into [0, 1].
    pub fn new(strengths: [f32; NUM_HARMONICS]) -> Self {
        Self {
            strengths: strengths.map(clamp_unit),
        }
    }

    /// All harmonics off.
    pub const fn silent() -> Self {
        Self {
            strengths: [0.0; NUM_HARMONICS],
        }
    }

    /// Start-up profile: strength rises by 0.1 per index (0.0, 0.1, ... 0.7).
    pub fn default_ramp() -> Self {
        let mut strengths = [0.0; NUM_HARMONICS];
        for (i, s) in strengths.iter_mut().enumerate() {
            *s = i as f32 * 0.1;
        }
        Self { strengths }
    }

    /// Linear blend: `a * (1 - t) + b * t` per harmonic.
    pub fn morph(a: &Self, b: &Self, t: f32) -> Self {
        let t = clamp_unit(t);
        let mut strengths = [0.0; NUM_HARMONICS];
        for (i, s) in strengths.iter_mut().enumerate() {
            *s = clamp_unit(a.strengths[i] * (1.0 - t) + b.strengths[i] * t);
        }
        Self { strengths }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.strengths.get(index).copied()
    }

    /// Write one strength (clamped). Returns `false` if `index` is out of range.
    pub fn set(&mut self, index: usize, value: f32) -> bool {
        match self.strengths.get_mut(index) {
            Some(slot) => {
                *slot = clamp_unit(value);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn strengths(&self) -> &[f32; NUM_HARMONICS] {
        &self.strengths
    }

    /// Number of harmonics with a strength above zero.
    pub fn active_count(&self) -> usize {
        self.strengths.iter().filter(|&&s| s > 0.0).count()
    }
}

impl Default for HarmonicProfile {
    fn default() -> Self {
        Self::default_ramp()
    }
}

/// Exactly eight values are accepted; each is clamped.
impl TryFrom<&[f32]> for HarmonicProfile {
    type Error = usize;

    fn try_from(values: &[f32]) -> Result<Self, Self::Error> {
        let strengths: [f32; NUM_HARMONICS] = values.try_into().map_err(|_| values.len())?;
        Ok(Self::new(strengths))
    }
}
