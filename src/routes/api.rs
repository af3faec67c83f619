// SPDX-License-Identifier: MIT

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Event, ProfileUpdate, UserProfile};
use crate::services::membership::{toggle_membership, Relation};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Firestore document IDs are at most 1500 bytes; anything near that in a
/// URL path is garbage input.
const MAX_EVENT_ID_LEN: usize = 128;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).patch(update_me))
        .route("/api/events", get(list_events))
        .route("/api/events/{id}", get(get_event))
        .route("/api/events/{id}/favorite", put(set_favorite))
        .route("/api/events/{id}/participation", put(set_participation))
        .route("/api/favorites", get(list_favorites))
}

fn validate_event_id(event_id: &str) -> Result<()> {
    if event_id.is_empty() || event_id.len() > MAX_EVENT_ID_LEN {
        return Err(AppError::BadRequest("invalid event ID".to_string()));
    }
    Ok(())
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
pub struct ProfileResponse {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub favorites: Vec<String>,
    pub participations: Vec<String>,
}

fn profile_response(uid: String, email: String, profile: UserProfile) -> ProfileResponse {
    ProfileResponse {
        uid,
        email,
        name: profile.name,
        profile_image: profile.profile_image,
        favorites: profile.favorites,
        participations: profile.participations,
    }
}

/// Get current user profile.
///
/// A user that never wrote a profile field still gets a response: the
/// document materializes lazily, so absence just means all defaults.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .get_user_profile(&user.uid)
        .await?
        .unwrap_or_default();

    Ok(Json(profile_response(user.uid, user.email, profile)))
}

#[derive(Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    name: Option<String>,
    #[validate(url(message = "profile_image must be a valid URL"))]
    profile_image: Option<String>,
}

/// Update display name and/or profile image with a merge write.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if req.name.is_none() && req.profile_image.is_none() {
        return Err(AppError::BadRequest(
            "at least one of name or profile_image is required".to_string(),
        ));
    }

    let update = ProfileUpdate {
        name: req.name,
        profile_image: req.profile_image,
    };
    state.db.update_user_profile(&user.uid, &update).await?;

    tracing::info!(uid = %user.uid, "Profile updated");

    let profile = state
        .db
        .get_user_profile(&user.uid)
        .await?
        .unwrap_or_default();

    Ok(Json(profile_response(user.uid, user.email, profile)))
}

// ─── Events ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct EventsQuery {
    /// Substring filter over title, category and location
    q: Option<String>,
}

/// Event list entry.
#[derive(Serialize)]
pub struct EventSummary {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub datetime: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub favorite_count: usize,
    pub participant_count: usize,
    pub is_favorited: bool,
}

impl EventSummary {
    fn from_event(event: Event, favorites: &[String]) -> Self {
        let is_favorited = favorites.contains(&event.id);
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            datetime: event.datetime,
            location: event.location,
            category: event.category,
            image_url: event.image_url,
            favorite_count: event.favorites.len(),
            participant_count: event.participants.len(),
            is_favorited,
        }
    }
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventSummary>,
    pub total: usize,
}

/// List events, optionally filtered by a search term.
///
/// The whole catalog is scanned and filtered linearly on every request,
/// matching the app's search-as-you-type behavior.
async fn list_events(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<EventsQuery>,
) -> Result<Json<EventsResponse>> {
    let query = params.q.unwrap_or_default();

    tracing::debug!(uid = %user.uid, query = %query, "Listing events");

    let all_events = state.db.list_events().await?;
    let profile = state
        .db
        .get_user_profile(&user.uid)
        .await?
        .unwrap_or_default();

    let events: Vec<EventSummary> = all_events
        .into_iter()
        .filter(|event| event.matches_search(&query))
        .map(|event| EventSummary::from_event(event, &profile.favorites))
        .collect();

    let total = events.len();
    Ok(Json(EventsResponse { events, total }))
}

/// Event detail response.
#[derive(Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: EventSummary,
    pub is_participating: bool,
}

/// Get a single event with the caller's favorite/participation flags.
async fn get_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<Json<EventDetailResponse>> {
    validate_event_id(&event_id)?;

    let event = state
        .db
        .get_event(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

    // Flags come from the user document, the authoritative side for "what
    // did I mark", even if the event-side array has drifted.
    let profile = state
        .db
        .get_user_profile(&user.uid)
        .await?
        .unwrap_or_default();
    let is_participating = profile.participations.contains(&event_id);

    Ok(Json(EventDetailResponse {
        event: EventSummary::from_event(event, &profile.favorites),
        is_participating,
    }))
}

// ─── Favorites ───────────────────────────────────────────────

/// List the caller's favorited events.
///
/// Resolves the ID list on the user document to event documents. IDs that
/// point to deleted or untitled events are dropped from the response but
/// left on the profile; un-favoriting is the user's call.
async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<EventsResponse>> {
    let profile = state
        .db
        .get_user_profile(&user.uid)
        .await?
        .unwrap_or_default();

    let events: Vec<EventSummary> = state
        .db
        .get_events_by_ids(&profile.favorites)
        .await?
        .into_iter()
        .filter(|event| event.title.is_some())
        .map(|event| EventSummary::from_event(event, &profile.favorites))
        .collect();

    let total = events.len();
    Ok(Json(EventsResponse { events, total }))
}

// ─── Membership Toggles ──────────────────────────────────────

#[derive(Deserialize)]
pub struct ToggleRequest {
    /// Desired membership state
    pub active: bool,
}

/// Updated arrays after a toggle, for local state refresh.
#[derive(Serialize)]
pub struct ToggleResponse {
    pub active: bool,
    /// Event IDs now recorded on the user document
    pub user_relation: Vec<String>,
    /// User IDs now recorded on the event document
    pub event_relation: Vec<String>,
}

/// Favorite or un-favorite an event for the current user.
async fn set_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(event_id): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>> {
    apply_toggle(&state, &user, &event_id, Relation::Favorite, req.active).await
}

/// Join or leave an event for the current user.
async fn set_participation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(event_id): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>> {
    apply_toggle(&state, &user, &event_id, Relation::Participation, req.active).await
}

async fn apply_toggle(
    state: &Arc<AppState>,
    user: &AuthUser,
    event_id: &str,
    relation: Relation,
    active: bool,
) -> Result<Json<ToggleResponse>> {
    validate_event_id(event_id)?;

    let update = toggle_membership(&state.db, relation, &user.uid, event_id, active).await?;

    Ok(Json(ToggleResponse {
        active,
        user_relation: update.user_ids,
        event_relation: update.event_ids,
    }))
}
