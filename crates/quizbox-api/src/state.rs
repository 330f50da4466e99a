//! Shared application state passed to all handlers via Axum's `State` extractor.

use std::sync::Arc;

use quizbox_auth::{
    AccessGuard, AccountService, CredentialStore, JwtDecoder, JwtEncoder, PasswordHasher,
    SessionManager,
};
use quizbox_core::config::AppConfig;
use quizbox_core::result::AppResult;

/// Application state shared across all request handlers.
///
/// Cheap to clone: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    // ── Config ──
    pub config: Arc<AppConfig>,

    // ── Persistence ──
    pub store: Arc<dyn CredentialStore>,

    // ── Auth ──
    pub session_manager: Arc<SessionManager>,
    pub access_guard: Arc<AccessGuard>,

    // ── Services ──
    pub account_service: Arc<AccountService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.config.environment)
            .field("session_manager", &self.session_manager)
            .field("account_service", &self.account_service)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires the auth services on top of `store`.
    ///
    /// Fails when the signing secret is missing.
    pub fn new(config: AppConfig, store: Arc<dyn CredentialStore>) -> AppResult<Self> {
        let auth = &config.auth;

        let jwt_encoder = Arc::new(JwtEncoder::new(auth)?);
        let jwt_decoder = Arc::new(JwtDecoder::new(auth)?);
        let password_hasher = Arc::new(PasswordHasher::from_config(auth));

        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&store),
            jwt_encoder,
            Arc::clone(&password_hasher),
            auth,
        ));
        let access_guard = Arc::new(AccessGuard::new(
            jwt_decoder,
            Arc::clone(&store),
            Arc::clone(&session_manager),
        ));
        let account_service = Arc::new(AccountService::new(
            Arc::clone(&store),
            password_hasher,
            auth,
        ));

        Ok(Self {
            config: Arc::new(config),
            store,
            session_manager,
            access_guard,
            account_service,
        })
    }
}
