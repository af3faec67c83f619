// SPDX-License-Identifier: MIT

//! Membership toggle between user and event documents.
//!
//! Favorites and participation are both stored as a pair of ID arrays: the
//! event ID on the user document and the user ID on the event document.
//! This module maintains that bidirectional relation with two independent
//! read-modify-merge-write round trips.
//!
//! Known limitations, inherited from the data model:
//! - the two sides are not written atomically, so a failure between them
//!   leaves a one-sided relation until the next successful toggle
//! - each side is a plain read-modify-write, so concurrent toggles on the
//!   same document resolve last-write-wins and can drop an update

use crate::db::{collections, RelationStore};
use crate::error::{AppError, Result};

/// A relation kind linking a user to an event.
///
/// Field names are asymmetric for participation: the user side records
/// `participations`, the event side `participants`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Favorite,
    Participation,
}

impl Relation {
    /// Field name on the user document (holds event IDs).
    pub fn user_field(self) -> &'static str {
        match self {
            Relation::Favorite => "favorites",
            Relation::Participation => "participations",
        }
    }

    /// Field name on the event document (holds user IDs).
    pub fn event_field(self) -> &'static str {
        match self {
            Relation::Favorite => "favorites",
            Relation::Participation => "participants",
        }
    }
}

/// Updated arrays from both sides of a toggle.
#[derive(Debug, Clone)]
pub struct MembershipUpdate {
    /// Event IDs now recorded on the user document
    pub user_ids: Vec<String>,
    /// User IDs now recorded on the event document
    pub event_ids: Vec<String>,
}

/// Set or clear `relation` between `user_id` and `event_id`.
///
/// The user side is written before the event side. Errors from either side
/// surface as-is; the already-completed user-side write is not rolled back.
/// Re-applying the same `active` state is a no-op on both sides.
pub async fn toggle_membership<S: RelationStore>(
    store: &S,
    relation: Relation,
    user_id: &str,
    event_id: &str,
    active: bool,
) -> Result<MembershipUpdate> {
    if user_id.is_empty() || event_id.is_empty() {
        return Err(AppError::BadRequest(
            "user and event IDs must be non-empty".to_string(),
        ));
    }

    let user_ids = apply_side(
        store,
        collections::USERS,
        user_id,
        relation.user_field(),
        event_id,
        active,
    )
    .await?;

    let event_ids = apply_side(
        store,
        collections::EVENTS,
        event_id,
        relation.event_field(),
        user_id,
        active,
    )
    .await?;

    tracing::debug!(
        user_id,
        event_id,
        relation = ?relation,
        active,
        "Membership updated"
    );

    Ok(MembershipUpdate { user_ids, event_ids })
}

/// Read-modify-merge-write one side of the relation.
///
/// Last write wins: a concurrent toggle on the same document between our
/// read and our write is overwritten.
async fn apply_side<S: RelationStore>(
    store: &S,
    collection: &str,
    doc_id: &str,
    field: &str,
    member_id: &str,
    active: bool,
) -> Result<Vec<String>> {
    let current = store.relation_ids(collection, doc_id, field).await?;
    let updated = apply_membership(current, member_id, active);
    store
        .write_relation(collection, doc_id, field, &updated)
        .await?;
    Ok(updated)
}

/// Compute the new ID list: append-unless-present, or remove all occurrences.
///
/// Removal clears duplicates too, so arrays corrupted by older clients heal
/// on the next un-toggle.
fn apply_membership(mut ids: Vec<String>, member_id: &str, active: bool) -> Vec<String> {
    if active {
        if !ids.iter().any(|id| id == member_id) {
            ids.push(member_id.to_string());
        }
    } else {
        ids.retain(|id| id != member_id);
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_add_appends_once() {
        let result = apply_membership(ids(&["e1"]), "e2", true);
        assert_eq!(result, ids(&["e1", "e2"]));

        let result = apply_membership(result, "e2", true);
        assert_eq!(result, ids(&["e1", "e2"]), "re-add must not duplicate");
    }

    #[test]
    fn test_remove_clears_all_occurrences() {
        let result = apply_membership(ids(&["e1", "e2", "e1", "e1"]), "e1", false);
        assert_eq!(result, ids(&["e2"]));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let result = apply_membership(ids(&["e1"]), "e9", false);
        assert_eq!(result, ids(&["e1"]));
    }

    #[test]
    fn test_add_to_empty() {
        let result = apply_membership(Vec::new(), "e1", true);
        assert_eq!(result, ids(&["e1"]));
    }

    #[test]
    fn test_field_names_per_side() {
        assert_eq!(Relation::Favorite.user_field(), "favorites");
        assert_eq!(Relation::Favorite.event_field(), "favorites");
        assert_eq!(Relation::Participation.user_field(), "participations");
        assert_eq!(Relation::Participation.event_field(), "participants");
    }
}
