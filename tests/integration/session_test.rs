//! Session validation, renewal, and revocation over HTTP.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use quizbox_api::AUTH_TOKEN_HEADER;
use quizbox_auth::{CredentialStore, JwtDecoder};
use quizbox_auth::error::SESSION_REJECTED_MESSAGE;
use quizbox_entity::session::Session;
use quizbox_entity::user::UserStatus;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_session_view_for_unverified_user() {
    let app = TestApp::new();
    let user_id = app
        .create_test_user("ada@example.com", "analytical-engine", UserStatus::Unverified)
        .await;
    let session_id = app.create_test_session(user_id).await;
    let token = app.issue_token(session_id, user_id, UserStatus::Unverified, Utc::now());

    let response = app
        .request("GET", "/api/v1/session", None, Some(&token.token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["session_id"], session_id);
    assert_eq!(response.body["data"]["user_id"], user_id);
    assert_eq!(response.body["data"]["status"], "unverified");

    // The strict guard refuses the same session.
    let response = app
        .request(
            "PUT",
            &format!("/api/v1/users/{user_id}"),
            Some(json!({"first_name": "Ada", "last_name": "L", "email": "ada@example.com"})),
            Some(&token.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stale_token_is_renewed_in_flight() {
    let app = TestApp::new();
    let user_id = app
        .create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;
    let session_id = app.create_test_session(user_id).await;
    let stale = app.issue_token(
        session_id,
        user_id,
        UserStatus::Active,
        Utc::now() - Duration::minutes(61),
    );

    let response = app
        .request(
            "PUT",
            &format!("/api/v1/users/{user_id}"),
            Some(json!({"first_name": "Ada", "last_name": "King", "email": "ada@example.com"})),
            Some(&stale.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let renewed = response
        .header(AUTH_TOKEN_HEADER)
        .expect("renewed token header");
    let claims = JwtDecoder::new(&app.config.auth)
        .unwrap()
        .decode(&renewed)
        .unwrap();
    assert_eq!(claims.session_id, session_id);
    assert!(claims.refresh > stale.claims.refresh);
    assert!(claims.exp > stale.claims.exp);
}

#[tokio::test]
async fn test_fresh_token_is_not_renewed() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;
    let token = app.login("ada@example.com", "analytical-engine").await;

    let response = app
        .request("DELETE", "/api/v1/users/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header(AUTH_TOKEN_HEADER).is_none());
}

#[tokio::test]
async fn test_logout_with_stale_token_does_not_renew() {
    let app = TestApp::new();
    let user_id = app
        .create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;
    let session_id = app.create_test_session(user_id).await;
    let before = app.store.find_session(session_id).await.unwrap().unwrap();
    let stale = app.issue_token(
        session_id,
        user_id,
        UserStatus::Active,
        Utc::now() - Duration::minutes(61),
    );

    let response = app
        .request("DELETE", "/api/v1/users/logout", None, Some(&stale.token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(response.header(AUTH_TOKEN_HEADER).is_none());

    let after = app.store.find_session(session_id).await.unwrap().unwrap();
    assert!(after.deactivated_at.is_some());
    assert_eq!(after.last_refreshed_at, before.last_refreshed_at);
}

#[tokio::test]
async fn test_deactivated_session_is_rejected() {
    let app = TestApp::new();
    let user_id = app
        .create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;
    let now = Utc::now();
    app.store
        .insert_session(Session {
            id: 42,
            user_id,
            deactivated_at: Some(now - Duration::minutes(5)),
            expires_at: None,
            ip_address: "192.0.2.10".into(),
            last_refreshed_at: now - Duration::minutes(10),
            user_agent: "integration-test".into(),
            created_at: now - Duration::minutes(10),
            updated_at: None,
        })
        .await;
    let token = app.issue_token(42, user_id, UserStatus::Active, now);

    let response = app
        .request("GET", "/api/v1/session", None, Some(&token.token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), SESSION_REJECTED_MESSAGE);
}

#[tokio::test]
async fn test_expired_session_row_is_rejected() {
    let app = TestApp::new();
    let user_id = app
        .create_test_user("ada@example.com", "analytical-engine", UserStatus::Active)
        .await;
    let now = Utc::now();
    app.store
        .insert_session(Session {
            id: 7,
            user_id,
            deactivated_at: None,
            expires_at: Some(now - Duration::seconds(1)),
            ip_address: String::new(),
            last_refreshed_at: now,
            user_agent: String::new(),
            created_at: now,
            updated_at: None,
        })
        .await;
    let token = app.issue_token(7, user_id, UserStatus::Active, now);

    let response = app
        .request("GET", "/api/v1/session", None, Some(&token.token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
