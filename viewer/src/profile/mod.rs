//! Key-value profile persistence. The room only stores one durable fact
//! today (the imported avatar reference), but the store is a port so tests
//! and future hosts can swap the backing.

use bevy::prelude::*;
use protocol::AssetReference;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PROFILE_FILE_PATH: &str = "./profile.yaml";

/// Key under which a completed avatar import is remembered across runs.
pub const IMPORTED_AVATAR_KEY: &str = "importedAvatarReference";

#[derive(Debug, Error)]
pub enum ProfileIoError {
    #[error("failed to read profile file: {0}")]
    Read(std::io::Error),
    #[error("failed to write profile file: {0}")]
    Write(std::io::Error),
    #[error("failed to decode YAML profile: {0}")]
    Deserialize(serde_yaml::Error),
    #[error("failed to encode YAML profile: {0}")]
    Serialize(serde_yaml::Error),
}

/// String key-value port backing the viewer's durable per-user state.
pub trait ProfileStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ProfileIoError>;
}

/// YAML-file-backed store, loaded once at startup and written through on
/// every `set`.
pub struct FileProfileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileProfileStore {
    pub fn load_or_default() -> Self {
        Self::load_from(PathBuf::from(PROFILE_FILE_PATH))
    }

    pub fn load_from(path: PathBuf) -> Self {
        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(error) => {
                eprintln!(
                    "Failed to load profile from '{}': {}. Starting with an empty profile.",
                    path.display(),
                    error
                );
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }
}

impl ProfileStore for FileProfileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ProfileIoError> {
        self.entries.insert(key.to_string(), value.to_string());
        write_entries(&self.entries, &self.path)
    }
}

/// Volatile store for tests and embedding without a writable disk.
#[derive(Default)]
pub struct MemoryProfileStore {
    entries: BTreeMap<String, String>,
}

impl ProfileStore for MemoryProfileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ProfileIoError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Resource)]
pub struct ProfileResource {
    store: Box<dyn ProfileStore>,
}

impl ProfileResource {
    pub fn new(store: impl ProfileStore) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ProfileIoError> {
        self.store.set(key, value)
    }

    /// The avatar reference remembered from a previous import, if any.
    pub fn imported_avatar(&self) -> Option<AssetReference> {
        self.store
            .get(IMPORTED_AVATAR_KEY)
            .filter(|value| !value.is_empty())
            .map(AssetReference::new)
    }

    pub fn remember_imported_avatar(
        &mut self,
        reference: &AssetReference,
    ) -> Result<(), ProfileIoError> {
        self.store.set(IMPORTED_AVATAR_KEY, reference.as_str())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, ProfileIoError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let raw = fs::read_to_string(path).map_err(ProfileIoError::Read)?;
    serde_yaml::from_str::<BTreeMap<String, String>>(&raw).map_err(ProfileIoError::Deserialize)
}

fn write_entries(entries: &BTreeMap<String, String>, path: &Path) -> Result<(), ProfileIoError> {
    let encoded = serde_yaml::to_string(entries).map_err(ProfileIoError::Serialize)?;
    fs::write(path, encoded).map_err(ProfileIoError::Write)
}
