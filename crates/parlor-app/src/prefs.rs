//! Locally persisted preferences.
//!
//! A single JSON blob with no schema version. Unknown fields are ignored and
//! missing fields fall back to their defaults, so older files keep loading.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark background.
    #[default]
    Dark,
    /// Light background.
    Light,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Preferences that survive a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Last display name used to join. The user id is never stored since the
    /// server reassigns it per connection.
    pub display_name: Option<String>,
    /// Rooms joined so far. Contains the configured default room once
    /// normalized.
    pub joined_rooms: BTreeSet<String>,
    /// Unsent input per room.
    pub drafts: BTreeMap<String, String>,
    /// Color theme.
    pub theme: Theme,
    /// Whether the room sidebar is hidden.
    pub sidebar_collapsed: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            display_name: None,
            joined_rooms: BTreeSet::new(),
            drafts: BTreeMap::new(),
            theme: Theme::default(),
            sidebar_collapsed: false,
        }
    }
}

impl Preferences {
    /// Restore invariants after loading from disk.
    ///
    /// Adds `default_room`, drops blank room names and empty drafts, and
    /// trims the display name.
    #[must_use]
    pub fn normalized(mut self, default_room: &str) -> Self {
        self.joined_rooms.retain(|room| !room.trim().is_empty());
        self.joined_rooms.insert(default_room.to_string());
        self.drafts.retain(|_, text| !text.is_empty());
        self.display_name = self
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        self
    }
}
