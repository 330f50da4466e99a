//! CORS layer configuration.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use quizbox_core::config::app::CorsConfig;

use crate::{AUTH_TOKEN_HEADER, REQUEST_ID_HEADER};

/// Builds a CORS tower layer from configuration.
///
/// `X-Auth-Token` is both accepted and exposed so browser clients can
/// pick up renewed tokens.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    // Origins
    if config.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    // Methods
    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    // Headers
    let auth = HeaderName::from_static(AUTH_TOKEN_HEADER);
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    layer = layer
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            auth.clone(),
            request_id.clone(),
        ])
        .expose_headers([auth, request_id]);

    layer.max_age(std::time::Duration::from_secs(config.max_age_seconds))
}
