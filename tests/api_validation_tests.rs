// SPDX-License-Identifier: MIT

//! API input validation tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_signup_rejects_invalid_email() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/signup",
            serde_json::json!({
                "email": "not-an-email",
                "password": "secret123",
                "confirm_password": "secret123",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/signup",
            serde_json::json!({
                "email": "user@example.com",
                "password": "short",
                "confirm_password": "short",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_rejects_password_mismatch() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/signup",
            serde_json::json!({
                "email": "user@example.com",
                "password": "secret123",
                "confirm_password": "secret124",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_password_reset_rejects_invalid_email() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/password-reset",
            serde_json::json!({ "email": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_missing_fields() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/login",
            serde_json::json!({ "email": "user@example.com" }),
        ))
        .await
        .unwrap();

    // Missing `password` fails JSON deserialization
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_password_rejects_mismatched_confirmation() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/password",
            serde_json::json!({
                "email": "user@example.com",
                "current_password": "secret123",
                "new_password": "secret456",
                "confirm_password": "secret457",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_update_requires_a_field() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", "test@example.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(authed_json_request(
            "PATCH",
            "/api/me",
            &token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_update_rejects_empty_name() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", "test@example.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(authed_json_request(
            "PATCH",
            "/api/me",
            &token,
            serde_json::json!({ "name": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_update_rejects_invalid_image_url() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", "test@example.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(authed_json_request(
            "PATCH",
            "/api/me",
            &token,
            serde_json::json!({ "profile_image": "not a url" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_toggle_rejects_oversized_event_id() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", "test@example.com", &state.config.jwt_signing_key);

    let long_id = "e".repeat(129);
    let response = app
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/events/{}/favorite", long_id),
            &token,
            serde_json::json!({ "active": true }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_toggle_rejects_missing_active_field() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", "test@example.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(authed_json_request(
            "PUT",
            "/api/events/e1/participation",
            &token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
