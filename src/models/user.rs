//! User profile model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore (`users/{uid}`).
///
/// Documents are created lazily by merge writes, so every field defaults
/// for the not-yet-written case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Profile picture URL
    #[serde(default)]
    pub profile_image: Option<String>,
    /// Event IDs the user has favorited
    #[serde(default)]
    pub favorites: Vec<String>,
    /// Event IDs the user participates in
    #[serde(default)]
    pub participations: Vec<String>,
}

/// Partial profile update, merge-written field by field.
///
/// Only fields that are `Some` are included in the write mask; the
/// relation arrays on the same document are never touched by this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub profile_image: Option<String>,
}
