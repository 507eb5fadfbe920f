use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use super::{PresetData, PresetError, PRESET_EXTENSION};

/// A directory of `.preset` files browsed in alphabetical order.
pub struct PresetLibrary {
    dir: PathBuf,
    files: Vec<PathBuf>,
    /// Index of the preset last loaded through next/prev
    current: Option<usize>,
}

impl PresetLibrary {
    /// Open `dir`, creating it if needed, and scan for presets.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PresetError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let mut library = Self {
            dir,
            files: Vec::new(),
            current: None,
        };
        library.refresh()?;
        Ok(library)
    }

    /// Rescan the directory. Keeps the current preset selected if it still exists.
    pub fn refresh(&mut self) -> Result<(), PresetError> {
        let selected = self.current_path().map(Path::to_path_buf);

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_preset = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(PRESET_EXTENSION));
            if is_preset && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        debug!("{} presets in {}", files.len(), self.dir.display());

        self.current = selected.and_then(|s| files.iter().position(|f| *f == s));
        self.files = files;
        Ok(())
    }

    /// Load the next preset, wrapping to the first after the last.
    pub fn next(&mut self) -> Result<PresetData, PresetError> {
        let len = self.files.len();
        if len == 0 {
            return Err(PresetError::NoPresets);
        }
        let index = self.current.map_or(0, |i| (i + 1) % len);
        self.load_at(index)
    }

    /// Load the previous preset, wrapping to the last before the first.
    pub fn prev(&mut self) -> Result<PresetData, PresetError> {
        let len = self.files.len();
        if len == 0 {
            return Err(PresetError::NoPresets);
        }
        let index = match self.current {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.load_at(index)
    }

    /// Load the preset at `index` and select it.
    ///
    /// The selection moves even when the file fails to load, so next/prev
    /// step past a broken preset instead of retrying it.
    pub fn load_at(&mut self, index: usize) -> Result<PresetData, PresetError> {
        let path = self.files.get(index).ok_or(PresetError::NoPresets)?;
        self.current = Some(index);
        PresetData::load_from_file(path)
    }

    /// Save under `name`, adding the `.preset` extension when it is missing.
    pub fn save(&mut self, name: &str, data: &PresetData) -> Result<PathBuf, PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::EmptyName);
        }

        let suffix = format!(".{PRESET_EXTENSION}");
        let file_name = if name.to_lowercase().ends_with(&suffix) {
            name.to_string()
        } else {
            format!("{name}{suffix}")
        };
        let path = self.dir.join(file_name);

        data.save_to_file(&path)?;
        self.refresh()?;
        self.current = self.files.iter().position(|f| *f == path);
        info!("{} presets after save", self.files.len());
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.and_then(|i| self.files.get(i)).map(PathBuf::as_path)
    }

    /// Display name of the current preset (file stem).
    pub fn current_name(&self) -> Option<String> {
        self.current_path()
            .and_then(Path::file_stem)
            .map(|stem| stem.to_string_lossy().into_owned())
    }
}
