//! Save/load of pilot profiles
//!
//! The core treats persistence as best-effort: a failed write is logged and
//! swallowed, a missing or corrupt record reads as absent. Records are keyed
//! by uppercased pilot name using the original save-key prefix, one JSON
//! document per pilot.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::profile::PilotProfile;

/// Key prefix shared by every pilot record.
const SAVE_KEY_PREFIX: &str = "galacticDefender_save_";

/// Storage key for a pilot name.
pub fn save_key(pilot_name: &str) -> String {
    format!("{}{}", SAVE_KEY_PREFIX, pilot_name.trim().to_uppercase())
}

/// Pluggable storage backend for pilot profiles.
pub trait SaveStore {
    /// Write the complete snapshot for this pilot. Best-effort.
    fn save(&mut self, profile: &PilotProfile);
    /// Read a pilot's snapshot, or None when absent or unreadable.
    fn load(&self, pilot_name: &str) -> Option<PilotProfile>;
}

/// In-memory store, used by tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, profile: &PilotProfile) {
        match serde_json::to_string(profile) {
            Ok(json) => {
                let _ = self.records.insert(save_key(&profile.pilot_name), json);
            }
            Err(err) => log::warn!("failed to serialize profile: {err}"),
        }
    }

    fn load(&self, pilot_name: &str) -> Option<PilotProfile> {
        let json = self.records.get(&save_key(pilot_name))?;
        match serde_json::from_str(json) {
            Ok(profile) => Some(profile),
            Err(err) => {
                log::warn!("corrupt save record for {pilot_name}: {err}");
                None
            }
        }
    }
}

/// File-backed store: one JSON file per pilot under a directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, pilot_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", save_key(pilot_name)))
    }
}

impl SaveStore for JsonFileStore {
    fn save(&mut self, profile: &PilotProfile) {
        let path = self.path_for(&profile.pilot_name);
        let json = match serde_json::to_string_pretty(profile) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("failed to serialize profile: {err}");
                return;
            }
        };
        if let Err(err) = fs::create_dir_all(&self.dir) {
            log::warn!("failed to create save directory: {err}");
            return;
        }
        if let Err(err) = fs::write(&path, json) {
            log::warn!("failed to write {}: {err}", path.display());
        }
    }

    fn load(&self, pilot_name: &str) -> Option<PilotProfile> {
        let path = self.path_for(pilot_name);
        let json = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&json) {
            Ok(profile) => {
                log::info!("loaded pilot {} from {}", pilot_name, path.display());
                Some(profile)
            }
            Err(err) => {
                log::warn!("corrupt save record at {}: {err}", path.display());
                None
            }
        }
    }
}
