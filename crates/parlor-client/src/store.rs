//! Preference file storage.
//!
//! Preferences are one pretty-printed JSON file. Writes go through a
//! temporary file and a rename so a crash never leaves a half-written file.
//! A missing or unreadable file yields defaults rather than an error, since
//! nothing in it is essential.

use std::{
    fs,
    path::{Path, PathBuf},
};

use parlor_app::Preferences;

use crate::error::Result;

const CONFIG_DIRECTORY_NAME: &str = "parlor";
const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Reads and writes [`Preferences`] at a fixed path.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/parlor/preferences.json`, relative to the working
    /// directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIRECTORY_NAME)
            .join(PREFERENCES_FILE_NAME)
    }

    /// File this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences, falling back to defaults.
    ///
    /// The result is not normalized: the default room comes from the
    /// configuration the `App` is built with.
    pub fn load(&self) -> Preferences {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no preferences file, using defaults");
                return Preferences::default();
            },
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to read preferences: {e}");
                return Preferences::default();
            },
        };

        match serde_json::from_str::<Preferences>(&text) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to parse preferences: {e}");
                Preferences::default()
            },
        }
    }

    /// Write preferences atomically.
    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(prefs)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), "saved preferences");
        Ok(())
    }
}
