//! Route tables.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/readings/{flow}", get(handlers::view))
        .route("/readings/{flow}/welcome", post(handlers::welcome))
        .route("/readings/{flow}/configure", post(handlers::configure))
        .route("/readings/{flow}/back", post(handlers::back))
        .route("/readings/{flow}/checkout", post(handlers::checkout))
        .route("/readings/{flow}/return", get(handlers::payment_return))
        .route("/readings/{flow}/result", get(handlers::result))
        .route("/readings/{flow}/export", get(handlers::export))
        .route("/readings/{flow}/reset", post(handlers::reset))
}

pub mod health {
    use axum::{routing::get, Json, Router};
    use serde::Serialize;

    use crate::state::AppState;

    /// Health check response payload.
    #[derive(Serialize)]
    pub struct HealthResponse {
        /// Overall service status.
        pub status: &'static str,
        /// Crate version from Cargo.toml.
        pub version: &'static str,
    }

    /// GET /health -- returns service health.
    async fn health_check() -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        })
    }

    /// Mount health check routes (intended for root-level, NOT under `/api/v1`).
    pub fn router() -> Router<AppState> {
        Router::new().route("/health", get(health_check))
    }
}
