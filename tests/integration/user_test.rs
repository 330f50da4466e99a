//! Profile endpoints over HTTP.

use axum::http::StatusCode;
use serde_json::json;

use quizbox_auth::CredentialStore;
use quizbox_auth::error::SESSION_REJECTED_MESSAGE;
use quizbox_entity::user::UserStatus;

use crate::helpers::TestApp;

fn profile(email: &str) -> serde_json::Value {
    json!({"first_name": "Ada", "last_name": "King", "email": email})
}

#[tokio::test]
async fn test_get_user_is_public() {
    let app = TestApp::new();
    let id = app
        .create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;

    let response = app
        .request("GET", &format!("/api/v1/users/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], id);

    let response = app.request("GET", "/api/v1/users/9999", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_update_own_profile() {
    let app = TestApp::new();
    let id = app
        .create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;
    let token = app.login("ada@example.com", "analytical-engine").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/v1/users/{id}"),
            Some(profile("Ada.King@example.com")),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["last_name"], "King");
    assert_eq!(response.body["data"]["email"], "ada.king@example.com");
}

#[tokio::test]
async fn test_cannot_update_someone_else() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;
    let other = app
        .create_test_user("charles@example.com", "difference-engine", UserStatus::Active)
        .await;
    let token = app.login("ada@example.com", "analytical-engine").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/v1/users/{other}"),
            Some(profile("charles@example.com")),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_requires_a_token() {
    let app = TestApp::new();
    let id = app
        .create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;

    let response = app
        .request(
            "PUT",
            &format!("/api/v1/users/{id}"),
            Some(profile("ada@example.com")),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_inactive_user_is_rejected_with_a_live_session() {
    let app = TestApp::new();
    let id = app
        .create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;
    let token = app.login("ada@example.com", "analytical-engine").await;

    app.store
        .set_user_status(id, UserStatus::Inactive)
        .await
        .unwrap();

    let response = app
        .request(
            "PUT",
            &format!("/api/v1/users/{id}"),
            Some(profile("ada@example.com")),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), SESSION_REJECTED_MESSAGE);
}
