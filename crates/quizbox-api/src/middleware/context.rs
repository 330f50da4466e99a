//! Per-request metadata: request ID, client IP, user agent.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use quizbox_auth::ClientInfo;

use crate::REQUEST_ID_HEADER;

/// Longest caller-supplied request ID that is echoed back.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Metadata attached to every request by [`request_context`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub request_id: String,
    /// First `X-Forwarded-For` entry, else the peer address, else empty.
    pub ip_address: String,
    pub user_agent: String,
}

impl From<&RequestMeta> for ClientInfo {
    fn from(meta: &RequestMeta) -> Self {
        Self {
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_default())
    }
}

/// Inserts [`RequestMeta`] into the request extensions and echoes the
/// request ID on the response.
pub async fn request_context(mut request: Request, next: Next) -> Response {
    let headers = request.headers();
    let request_id = header_str(headers, REQUEST_ID_HEADER)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let ip_address = forwarded_for(headers)
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_default();

    let user_agent = header_str(request.headers(), "user-agent")
        .unwrap_or_default()
        .to_string();

    request.extensions_mut().insert(RequestMeta {
        request_id: request_id.clone(),
        ip_address,
        user_agent,
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-forwarded-for")?
        .split(',')
        .map(str::trim)
        .find(|entry| !entry.is_empty())
        .map(str::to_owned)
}
