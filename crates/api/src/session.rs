//! Caller session identification.
//!
//! There is no login: a caller is identified by an opaque UUID carried in
//! the `x-arcana-session` header. The middleware accepts a valid id,
//! issues a fresh one otherwise, and always echoes the id on the response
//! so clients can persist it.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

/// Header carrying the caller's session id.
pub const SESSION_HEADER: &str = "x-arcana-session";

/// The caller's session id, available to handlers as an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// Resolve or issue the caller's session id and echo it on the response.
pub async fn session_id_layer(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .unwrap_or_else(Uuid::new_v4);

    request.extensions_mut().insert(SessionId(id));
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}
