//! Registration, login, and logout over HTTP.

use axum::http::StatusCode;
use serde_json::json;

use quizbox_api::AUTH_TOKEN_HEADER;
use quizbox_auth::error::{BAD_CREDENTIALS_MESSAGE, SESSION_REJECTED_MESSAGE, TOKEN_MISSING_MESSAGE};
use quizbox_entity::user::UserStatus;

use crate::helpers::TestApp;

fn registration(email: &str) -> serde_json::Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "password": "analytical-engine",
        "password_confirmation": "analytical-engine",
    })
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/v1/users", Some(registration("Ada@Example.com")), None)
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["email"], "ada@example.com");
    assert_eq!(response.body["data"]["status"], "active");
    assert!(response.body["data"].get("password_hash").is_none());

    let response = app
        .request(
            "POST",
            "/api/v1/users/login",
            Some(json!({"email": " ada@example.com ", "password": "analytical-engine"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let header = response.header(AUTH_TOKEN_HEADER).expect("token header");
    assert_eq!(response.body["data"]["token"], header.as_str());
    assert_eq!(response.body["data"]["user"]["first_name"], "Ada");
    assert_eq!(app.store.session_count().await, 1);
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let app = TestApp::new();
    app.request("POST", "/api/v1/users", Some(registration("ada@example.com")), None)
        .await;

    let response = app
        .request("POST", "/api/v1/users", Some(registration("ADA@example.com")), None)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new();

    let mut mismatched = registration("ada@example.com");
    mismatched["password_confirmation"] = json!("something-else");
    let response = app
        .request("POST", "/api/v1/users", Some(mismatched), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("POST", "/api/v1/users", Some(registration("not-an-email")), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;

    let wrong_password = app
        .request(
            "POST",
            "/api/v1/users/login",
            Some(json!({"email": "ada@example.com", "password": "difference-engine"})),
            None,
        )
        .await;
    let unknown_email = app
        .request(
            "POST",
            "/api/v1/users/login",
            Some(json!({"email": "charles@example.com", "password": "difference-engine"})),
            None,
        )
        .await;

    for response in [&wrong_password, &unknown_email] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.message(), BAD_CREDENTIALS_MESSAGE);
        assert!(response.header(AUTH_TOKEN_HEADER).is_none());
    }
    assert_eq!(app.store.session_count().await, 0);
}

#[tokio::test]
async fn test_unverified_user_cannot_log_in() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com", "analytical-engine", UserStatus::Unverified)
        .await;

    let response = app
        .request(
            "POST",
            "/api/v1/users/login",
            Some(json!({"email": "ada@example.com", "password": "analytical-engine"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.session_count().await, 0);
}

#[tokio::test]
async fn test_logout_revokes_the_token() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;
    let token = app.login("ada@example.com", "analytical-engine").await;

    let response = app
        .request("DELETE", "/api/v1/users/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["success"], true);

    let response = app
        .request("GET", "/api/v1/session", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), SESSION_REJECTED_MESSAGE);
}

#[tokio::test]
async fn test_missing_token_has_its_own_message() {
    let app = TestApp::new();

    let response = app.request("DELETE", "/api/v1/users/logout", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), TOKEN_MISSING_MESSAGE);

    let response = app
        .request("DELETE", "/api/v1/users/logout", None, Some("not.a.token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), SESSION_REJECTED_MESSAGE);
}

#[tokio::test]
async fn test_healthz() {
    let app = TestApp::new();

    let response = app.request("GET", "/healthz", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");

    let response = app.request("HEAD", "/healthz", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header("x-request-id").is_some());
}
