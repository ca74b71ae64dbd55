//! # Save data
//!
//! The only state that outlives a session: how many days have been rewound
//! and where the player stands. Actor histories are volatile and never saved.
//!
//! Encoded with bincode's standard config. The version leads the record so a
//! file from an older layout is refused rather than misread.

use std::{
    fs,
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::resources::day_clock::DayClock;

pub const SAVE_VERSION: u16 = 1;

/// Used when `CHRONO_SAVE` is not set.
pub const DEFAULT_SAVE_PATH: &str = "chrono-sleuth-save.bin";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode save: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode save: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("save has version {found}, expected {expected}")]
    Version { found: u16, expected: u16 },
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ActorSave {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for ActorSave {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<ActorSave> for Vec2 {
    fn from(save: ActorSave) -> Self {
        Vec2::new(save.x, save.y)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct SaveData {
    pub version: u16,
    pub rewind_count: u32,
    pub player: ActorSave,
}

impl SaveData {
    pub fn capture(clock: &DayClock, player: Vec2) -> Self {
        Self {
            version: SAVE_VERSION,
            rewind_count: clock.rewind_count(),
            player: player.into(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveError> {
        Ok(bincode::serde::encode_to_vec(self, bincode::config::standard())?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SaveError> {
        let (save, _): (SaveData, usize) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        if save.version != SAVE_VERSION {
            return Err(SaveError::Version { found: save.version, expected: SAVE_VERSION });
        }
        Ok(save)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), SaveError> {
        fs::write(path, self.to_bytes()?)?;
        log::debug!("wrote save to {}", path.display());
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, SaveError> {
        Self::from_bytes(&fs::read(path)?)
    }
}

/// Where saves go for this session.
#[derive(Clone, Debug, Resource)]
pub struct SaveSlot {
    path: PathBuf,
}

impl Default for SaveSlot {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_PATH)
    }
}

impl SaveSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `CHRONO_SAVE` when set, otherwise the default file name.
    pub fn from_env() -> Self {
        std::env::var_os("CHRONO_SAVE").map(Self::new).unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<SaveData>, SaveError> {
        if !self.exists() {
            return Ok(None);
        }
        SaveData::read_from(&self.path).map(Some)
    }

    pub fn store(&self, save: &SaveData) -> Result<(), SaveError> {
        save.write_to(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SaveData {
        SaveData {
            version: SAVE_VERSION,
            rewind_count: 7,
            player: ActorSave { x: 920., y: 1500. },
        }
    }

    #[test]
    fn test_slot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let slot = SaveSlot::new(dir.path().join("save.bin"));

        assert!(slot.load().unwrap().is_none());
        slot.store(&sample()).unwrap();
        assert_eq!(slot.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_capture_reads_clock() {
        let mut clock = DayClock::default();
        clock.restore(3);
        let save = SaveData::capture(&clock, Vec2::new(1., -2.));

        assert_eq!(save.version, SAVE_VERSION);
        assert_eq!(save.rewind_count, 3);
        assert_eq!(Vec2::from(save.player), Vec2::new(1., -2.));
    }

    #[test]
    fn test_rejects_other_version() {
        let mut old = sample();
        old.version = SAVE_VERSION + 1;
        let bytes = old.to_bytes().unwrap();

        assert!(matches!(
            SaveData::from_bytes(&bytes),
            Err(SaveError::Version { found, expected }) if found == SAVE_VERSION + 1 && expected == SAVE_VERSION
        ));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.bin");
        let bytes = sample().to_bytes().unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        assert!(matches!(SaveData::read_from(&path), Err(SaveError::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(SaveData::read_from(&dir.path().join("nope.bin")), Err(SaveError::Io(_))));
    }
}
