//! Application builder: wires router, middleware, and state into an Axum app.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use quizbox_auth::{CredentialStore, PgCredentialStore};
use quizbox_core::config::AppConfig;
use quizbox_core::error::AppError;
use quizbox_database::connection::DatabasePool;
use quizbox_database::migration::run_migrations;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let server = state.config.server.clone();

    build_router(state)
        .layer(RequestBodyLimitLayer::new(server.body_limit_bytes))
        .layer(timeout_layer(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&server.cors))
        .layer(TraceLayer::new_for_http())
}

/// Answers `408 Request Timeout` once a request runs past `limit`.
fn timeout_layer(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, limit)
}

/// Runs the GoQuizbox server against PostgreSQL until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        environment = %config.environment,
        "Starting GoQuizbox v{}",
        env!("CARGO_PKG_VERSION")
    );

    // ── Step 1: Database connection ──────────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    if !db.health_check().await? {
        return Err(AppError::service_unavailable(
            "database did not answer the health check",
        ));
    }

    // ── Step 2: Migrations ───────────────────────────────────────
    if config.database.run_migrations {
        run_migrations(db.pool()).await?;
    } else {
        tracing::info!("Skipping database migrations (database.run_migrations = false)");
    }

    // ── Step 3: Auth services ────────────────────────────────────
    let store: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(db.pool().clone()));
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, store)?;

    // ── Step 4: Serve ────────────────────────────────────────────
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("GoQuizbox server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("GoQuizbox server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
