//! Event model for storage and API.

use serde::{Deserialize, Serialize};

/// Event stored in Firestore (`Events/{id}`).
///
/// Events are seeded by an external admin tool, so every field is treated
/// as optional with a defined default when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    /// Document ID, populated by the Firestore client on reads
    #[serde(alias = "_firestore_id", default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Display datetime string (not parsed server-side)
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// User IDs that favorited this event
    #[serde(default)]
    pub favorites: Vec<String>,
    /// User IDs attending this event
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Event {
    /// Case-insensitive substring match against title, category and location.
    ///
    /// An empty query matches everything. This is the search behavior the
    /// app recomputes on every keystroke; no indexing.
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let term = query.to_lowercase();
        [&self.title, &self.category, &self.location]
            .iter()
            .any(|field| {
                field
                    .as_deref()
                    .is_some_and(|value| value.to_lowercase().contains(&term))
            })
    }
}
