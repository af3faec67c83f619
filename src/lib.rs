// SPDX-License-Identifier: MIT

//! Event Buddy: backend API for the Event Buddy event-discovery app.
//!
//! This crate provides the HTTP API for browsing and searching events,
//! toggling favorites and participation, and managing user profiles,
//! all persisted in Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::IdentityClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity: IdentityClient,
}
