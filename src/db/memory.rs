// SPDX-License-Identifier: MIT

//! In-memory document store for tests and offline development.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::RelationStore;
use crate::error::AppError;

/// In-memory stand-in for the document store's relation arrays.
///
/// Documents are field -> ids maps keyed by (collection, doc id), created
/// implicitly on first write like a Firestore merge-upsert. Writes can be
/// made to fail per collection to exercise partial-failure paths.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    docs: HashMap<(String, String), HashMap<String, Vec<String>>>,
    failing_collections: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a field directly, bypassing set semantics. Lets tests stage
    /// documents with duplicate IDs left behind by old client bugs.
    pub async fn seed(&self, collection: &str, doc_id: &str, field: &str, ids: &[&str]) {
        let mut inner = self.inner.lock().await;
        inner
            .docs
            .entry((collection.to_string(), doc_id.to_string()))
            .or_default()
            .insert(field.to_string(), ids.iter().map(|s| s.to_string()).collect());
    }

    /// Make every subsequent write to `collection` fail.
    pub async fn fail_writes(&self, collection: &str) {
        let mut inner = self.inner.lock().await;
        inner.failing_collections.insert(collection.to_string());
    }

    /// Whether the document exists at all (i.e. was ever written).
    pub async fn contains(&self, collection: &str, doc_id: &str) -> bool {
        let inner = self.inner.lock().await;
        inner
            .docs
            .contains_key(&(collection.to_string(), doc_id.to_string()))
    }

    /// Snapshot of a document's fields, or `None` if it was never written.
    pub async fn document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Option<HashMap<String, Vec<String>>> {
        let inner = self.inner.lock().await;
        inner
            .docs
            .get(&(collection.to_string(), doc_id.to_string()))
            .cloned()
    }
}

impl RelationStore for MemoryStore {
    async fn relation_ids(
        &self,
        collection: &str,
        doc_id: &str,
        field: &str,
    ) -> Result<Vec<String>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .docs
            .get(&(collection.to_string(), doc_id.to_string()))
            .and_then(|fields| fields.get(field))
            .cloned()
            .unwrap_or_default())
    }

    async fn write_relation(
        &self,
        collection: &str,
        doc_id: &str,
        field: &str,
        ids: &[String],
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        if inner.failing_collections.contains(collection) {
            return Err(AppError::Database(format!(
                "injected write failure for collection {}",
                collection
            )));
        }
        inner
            .docs
            .entry((collection.to_string(), doc_id.to_string()))
            .or_default()
            .insert(field.to_string(), ids.to_vec());
        Ok(())
    }
}
