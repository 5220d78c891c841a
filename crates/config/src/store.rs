//! Preference stores handed to the canvas at construction.
//!
//! The canvas never reaches for global state: it receives a
//! [`PreferenceStore`] by reference and goes through its accessors.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, info};

use crate::error::ConfigError;
use crate::preferences::Preferences;

/// Get/set access to persisted preferences.
///
/// Implementations use interior mutability so a single store can be shared
/// between the canvas and the glue layer.
pub trait PreferenceStore: Send + Sync {
    /// Snapshot of the current preferences
    fn load(&self) -> Preferences;

    /// Replace the stored preferences
    fn save(&self, prefs: &Preferences) -> Result<(), ConfigError>;

    fn stamp_text(&self) -> String {
        self.load().stamp_text
    }

    fn set_stamp_text(&self, text: &str) -> Result<(), ConfigError> {
        let mut prefs = self.load();
        prefs.stamp_text = text.to_string();
        self.save(&prefs)
    }

    fn artist_name(&self) -> String {
        self.load().artist_name
    }

    fn set_artist_name(&self, name: &str) -> Result<(), ConfigError> {
        let mut prefs = self.load();
        prefs.artist_name = name.to_string();
        self.save(&prefs)
    }
}

/// In-memory store, used by tests and hosts without persistence
#[derive(Debug, Default)]
pub struct MemoryStore {
    prefs: RwLock<Preferences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(prefs: Preferences) -> Self {
        Self {
            prefs: RwLock::new(prefs),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Preferences {
        self.prefs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        *self.prefs.write().unwrap_or_else(PoisonError::into_inner) = prefs.clone();
        Ok(())
    }
}

/// Store backed by a JSON file, written through on every save
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    prefs: RwLock<Preferences>,
}

impl JsonFileStore {
    /// Open the store at `path`, falling back to defaults when the file
    /// does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let prefs = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let prefs: Preferences = serde_json::from_str(&contents)?;
                info!("Loaded preferences from {}", path.display());
                prefs
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No preference file at {}, using defaults", path.display());
                Preferences::default()
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        Ok(Self {
            path,
            prefs: RwLock::new(prefs),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> Preferences {
        self.prefs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, json).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        *self.prefs.write().unwrap_or_else(PoisonError::into_inner) = prefs.clone();
        debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sumi-config-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_store_accessors() {
        let store = MemoryStore::new();
        assert_eq!(store.stamp_text(), "雅");

        store.set_stamp_text("書道").unwrap();
        store.set_artist_name("Ren").unwrap();

        assert_eq!(store.stamp_text(), "書道");
        assert_eq!(store.artist_name(), "Ren");
    }

    #[test]
    fn test_file_store_round_trips_through_disk() {
        let path = temp_path("roundtrip");
        let _ = std::fs::remove_file(&path);

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.load(), Preferences::default());
        store.set_stamp_text("山水").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.stamp_text(), "山水");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_rejects_malformed_json() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::open(&path);
        assert!(matches!(result, Err(ConfigError::Json(_))));

        let _ = std::fs::remove_file(&path);
    }
}
