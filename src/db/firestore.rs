// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, relation arrays)
//! - Events (catalog reads, relation arrays)

use crate::db::{collections, RelationStore};
use crate::error::AppError;
use crate::models::{Event, ProfileUpdate, UserProfile};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing
        // a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by uid. Missing documents read as `None`.
    pub async fn get_user_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Merge-write the profile fields that are present in `update`.
    ///
    /// Uses a field mask so relation arrays and any fields this server
    /// does not know about survive the write. Creates the document on
    /// first write.
    pub async fn update_user_profile(
        &self,
        uid: &str,
        update: &ProfileUpdate,
    ) -> Result<(), AppError> {
        let mut fields: Vec<String> = Vec::new();
        if update.name.is_some() {
            fields.push("name".to_string());
        }
        if update.profile_image.is_some() {
            fields.push("profile_image".to_string());
        }
        if fields.is_empty() {
            return Ok(());
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(fields)
            .in_col(collections::USERS)
            .document_id(uid)
            .object(update)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Event Operations ────────────────────────────────────────

    /// Get an event by document ID.
    pub async fn get_event(&self, event_id: &str) -> Result<Option<Event>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EVENTS)
            .obj()
            .one(event_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Full-collection scan of the event catalog.
    ///
    /// The catalog is small enough that the app fetches it whole on every
    /// screen focus; no pagination.
    pub async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::EVENTS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch a batch of events by ID with bounded concurrency.
    ///
    /// IDs that no longer resolve to a document are silently dropped;
    /// dangling favorites are expected (event deleted out-of-band, or a
    /// one-sided toggle).
    pub async fn get_events_by_ids(&self, event_ids: &[String]) -> Result<Vec<Event>, AppError> {
        let results: Vec<Result<Option<Event>, AppError>> = stream::iter(event_ids.to_vec())
            .map(|event_id| async move { self.get_event(&event_id).await })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let mut events = Vec::with_capacity(event_ids.len());
        for result in results {
            if let Some(event) = result? {
                events.push(event);
            }
        }
        Ok(events)
    }
}

// ─── Relation Array Operations ───────────────────────────────────

impl RelationStore for FirestoreDb {
    async fn relation_ids(
        &self,
        collection: &str,
        doc_id: &str,
        field: &str,
    ) -> Result<Vec<String>, AppError> {
        let doc: Option<serde_json::Value> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Missing document, missing field, and non-array field all read as empty.
        let ids = doc
            .as_ref()
            .and_then(|fields| fields.get(field))
            .and_then(|value| value.as_array())
            .map(|array| {
                array
                    .iter()
                    .filter_map(|value| value.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default();

        Ok(ids)
    }

    async fn write_relation(
        &self,
        collection: &str,
        doc_id: &str,
        field: &str,
        ids: &[String],
    ) -> Result<(), AppError> {
        let patch = serde_json::json!({ field: ids });

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields([field.to_string()])
            .in_col(collection)
            .document_id(doc_id)
            .object(&patch)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
