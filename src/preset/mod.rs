//! Preset files and host session state.
//!
//! A preset is a JSON object with one `h0..h7` table per profile and a
//! top-level `morphValue`:
//!
//! ```json
//! {
//!   "harm1": { "h0": 0.0, "h1": 0.1, ... "h7": 0.7 },
//!   "harm2": { "h0": 0.0, ... },
//!   "combo": { "h0": 0.0, ... },
//!   "morphValue": 0.5
//! }
//! ```
//!
//! `combo` is written so older readers find it, but it is always recomputed
//! from the other three on load.

pub mod library;

use std::{fs, path::Path};

use log::{info, warn};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::{
    harmonic::{HarmonicProfile, NUM_HARMONICS},
    store::{ProfileError, ProfileState, ProfileStore},
};

pub use library::PresetLibrary;

/// File extension used for preset files.
pub const PRESET_EXTENSION: &str = "preset";

#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("preset I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("preset name is empty")]
    EmptyName,
    #[error("no presets found")]
    NoPresets,
}

/// The persisted part of a [`ProfileStore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetData {
    pub harm1: HarmonicProfile,
    pub harm2: HarmonicProfile,
    pub morph: f32,
}

impl PresetData {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PresetError> {
        let combo = HarmonicProfile::morph(&self.harm1, &self.harm2, self.morph);
        let file = PresetFileOut {
            harm1: Row(&self.harm1),
            harm2: Row(&self.harm2),
            combo: Row(&combo),
            morph_value: self.morph,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Parse a preset document.
    ///
    /// Only malformed JSON is an error. A profile table that is missing, has
    /// the wrong number of entries, or holds a non-numeric value is replaced
    /// by a silent profile; a bad `morphValue` becomes 0.
    pub fn from_json(text: &str) -> Result<Self, PresetError> {
        let file: PresetFileIn = serde_json::from_str(text)?;

        let harm1 = read_row(&file.harm1).unwrap_or_else(|err| {
            warn!("harm1: {err}, using a silent profile");
            HarmonicProfile::silent()
        });
        let harm2 = read_row(&file.harm2).unwrap_or_else(|err| {
            warn!("harm2: {err}, using a silent profile");
            HarmonicProfile::silent()
        });
        let morph = match &file.morph_value {
            Value::Null => 0.0,
            value => value.as_f64().map(|v| v as f32).unwrap_or_else(|| {
                warn!("morphValue {value} is not a number, using 0");
                0.0
            }),
        };

        Ok(Self {
            harm1,
            harm2,
            morph,
        })
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), PresetError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        info!("saved preset {}", path.display());
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let data = Self::from_json(&fs::read_to_string(path)?)?;
        info!("loaded preset {}", path.display());
        Ok(data)
    }
}

impl From<ProfileState> for PresetData {
    fn from(state: ProfileState) -> Self {
        Self {
            harm1: state.harm1,
            harm2: state.harm2,
            morph: state.morph,
        }
    }
}

impl ProfileStore {
    pub fn preset(&self) -> PresetData {
        self.state().into()
    }

    /// Replace the whole store with a preset.
    pub fn apply_preset(&mut self, preset: &PresetData) -> Result<(), ProfileError> {
        self.replace_all(
            preset.harm1.strengths(),
            preset.harm2.strengths(),
            preset.morph,
        )
    }
}

/// Host session blob for the current store contents.
pub fn save_state(store: &ProfileStore) -> Result<Vec<u8>, PresetError> {
    Ok(store.preset().to_json()?.into_bytes())
}

/// Restore a session blob produced by [`save_state`].
pub fn restore_state(store: &mut ProfileStore, bytes: &[u8]) -> Result<(), PresetError> {
    let text = std::str::from_utf8(bytes).map_err(|err| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, err)
    })?;
    let preset = PresetData::from_json(text)?;
    // Rows are always eight values after parsing
    if let Err(err) = store.apply_preset(&preset) {
        warn!("session state rejected: {err}");
    }
    Ok(())
}

/// Profile written as an `h0..h7` table.
struct Row<'a>(&'a HarmonicProfile);

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NUM_HARMONICS))?;
        for (i, value) in self.0.strengths().iter().enumerate() {
            map.serialize_entry(&format!("h{i}"), value)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct PresetFileOut<'a> {
    harm1: Row<'a>,
    harm2: Row<'a>,
    combo: Row<'a>,
    #[serde(rename = "morphValue")]
    morph_value: f32,
}

#[derive(Deserialize)]
struct PresetFileIn {
    #[serde(default)]
    harm1: Value,
    #[serde(default)]
    harm2: Value,
    #[serde(rename = "morphValue", default)]
    morph_value: Value,
}

fn read_row(table: &Value) -> Result<HarmonicProfile, ProfileError> {
    let table = table.as_object().ok_or_else(|| ProfileError::InvalidData {
        reason: "missing or not a table".to_string(),
    })?;
    if table.len() != NUM_HARMONICS {
        return Err(ProfileError::InvalidData {
            reason: format!("{} entries, expected {NUM_HARMONICS}", table.len()),
        });
    }

    let mut values = [0.0f32; NUM_HARMONICS];
    for (i, slot) in values.iter_mut().enumerate() {
        let key = format!("h{i}");
        *slot = table
            .get(&key)
            .and_then(Value::as_f64)
            .ok_or_else(|| ProfileError::InvalidData {
                reason: format!("{key} missing or not a number"),
            })? as f32;
    }
    Ok(HarmonicProfile::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ComboSource, ProfileSlot};

    fn sample() -> PresetData {
        PresetData {
            harm1: HarmonicProfile::new([0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]),
            harm2: HarmonicProfile::new([1.0, 0.9, 0.75, 0.5, 0.33, 0.25, 0.1, 0.05]),
            morph: 0.35,
        }
    }

    #[test]
    fn test_json_uses_stable_keys() {
        let json = sample().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["morphValue"].as_f64().unwrap() as f32, 0.35);
        for table in ["harm1", "harm2", "combo"] {
            let row = value[table].as_object().unwrap();
            assert_eq!(row.len(), NUM_HARMONICS);
            for i in 0..NUM_HARMONICS {
                assert!(row.contains_key(&format!("h{i}")));
            }
        }
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        let data = sample();
        let parsed = PresetData::from_json(&data.to_json().unwrap()).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_short_row_becomes_silent() {
        let json = r#"{
            "harm1": { "h0": 0.5, "h1": 0.5 },
            "harm2": { "h0": 1, "h1": 1, "h2": 1, "h3": 1, "h4": 1, "h5": 1, "h6": 1, "h7": 1 },
            "morphValue": 0.25
        }"#;
        let data = PresetData::from_json(json).unwrap();
        assert_eq!(data.harm1, HarmonicProfile::silent());
        assert_eq!(data.harm2, HarmonicProfile::new([1.0; NUM_HARMONICS]));
        assert_eq!(data.morph, 0.25);
    }

    #[test]
    fn test_non_numeric_value_becomes_silent() {
        let json = r#"{
            "harm1": {
                "h0": 0.5, "h1": "loud", "h2": 0, "h3": 0, "h4": 0, "h5": 0, "h6": 0, "h7": 0
            },
            "morphValue": "half"
        }"#;
        let data = PresetData::from_json(json).unwrap();
        assert_eq!(data.harm1, HarmonicProfile::silent());
        assert_eq!(data.harm2, HarmonicProfile::silent()); // missing table
        assert_eq!(data.morph, 0.0);
    }

    #[test]
    fn test_wrong_shape_row_becomes_silent() {
        let json = r#"{ "harm1": [0.1, 0.2], "harm2": 3, "morphValue": 1 }"#;
        let data = PresetData::from_json(json).unwrap();
        assert_eq!(data.harm1, HarmonicProfile::silent());
        assert_eq!(data.harm2, HarmonicProfile::silent());
        assert_eq!(data.morph, 1.0);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        let json = r#"{
            "harm1": { "h0": -3, "h1": 7, "h2": 0, "h3": 0, "h4": 0, "h5": 0, "h6": 0, "h7": 0 },
            "harm2": { "h0": 0, "h1": 0, "h2": 0, "h3": 0, "h4": 0, "h5": 0, "h6": 0, "h7": 0 },
            "morphValue": 0
        }"#;
        let data = PresetData::from_json(json).unwrap();
        assert_eq!(data.harm1.get(0), Some(0.0));
        assert_eq!(data.harm1.get(1), Some(1.0));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            PresetData::from_json("{ not json"),
            Err(PresetError::Json(_))
        ));
    }

    #[test]
    fn test_store_preset_round_trip() {
        let (mut store, _reader) = ProfileStore::with_reader(8);
        store.apply_preset(&sample()).unwrap();
        assert_eq!(store.preset(), sample());
        assert_eq!(store.profile(ProfileSlot::Harm2), sample().harm2);
    }

    #[test]
    fn test_session_state_round_trip() {
        let (mut source, _a) = ProfileStore::with_reader(8);
        source.apply_preset(&sample()).unwrap();
        let blob = save_state(&source).unwrap();

        let (mut target, _b) = ProfileStore::with_reader(8);
        restore_state(&mut target, &blob).unwrap();
        assert_eq!(target.state(), source.state());
    }

    #[test]
    fn test_loads_reach_the_audio_reader() {
        let (mut source, _a) = ProfileStore::with_reader(8);
        source.apply_preset(&sample()).unwrap();
        let blob = save_state(&source).unwrap();

        let (mut target, mut reader) = ProfileStore::with_reader(8);
        restore_state(&mut target, &blob).unwrap();
        assert_eq!(reader.latest(), target.combo());
        assert_eq!(reader.latest(), source.combo());

        let other = PresetData {
            morph: 0.9,
            ..sample()
        };
        target.apply_preset(&other).unwrap();
        assert_eq!(reader.latest(), target.combo());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("additive-midi-preset-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("round_trip.preset");

        sample().save_to_file(&path).unwrap();
        assert_eq!(PresetData::load_from_file(&path).unwrap(), sample());

        fs::remove_dir_all(&dir).unwrap();
    }
}
