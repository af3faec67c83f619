//! Database layer (Firestore).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Capitalized in the production dataset; kept as-is.
    pub const EVENTS: &str = "Events";
}

/// Storage seam for the membership toggle.
///
/// Keyed by collection/document/field names so both relation shapes
/// (`favorites`/`favorites` and `participations`/`participants`) go
/// through the same two operations. Implemented by [`FirestoreDb`] and by
/// the in-memory [`MemoryStore`] test double.
#[allow(async_fn_in_trait)]
pub trait RelationStore {
    /// Read an array-valued field as a list of IDs.
    ///
    /// A missing document, a missing field, or a non-array field all read
    /// as empty.
    async fn relation_ids(
        &self,
        collection: &str,
        doc_id: &str,
        field: &str,
    ) -> Result<Vec<String>, AppError>;

    /// Merge-write a single array-valued field, preserving other fields.
    ///
    /// Creates the document if it does not exist.
    async fn write_relation(
        &self,
        collection: &str,
        doc_id: &str,
        field: &str,
        ids: &[String],
    ) -> Result<(), AppError>;
}
