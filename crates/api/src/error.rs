use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use arcana_astro::AstroError;
use arcana_core::error::CoreError;
use arcana_payments::GatewayError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `arcana_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A payment-provider error.
    #[error("Payment provider error: {0}")]
    Gateway(#[from] GatewayError),

    /// A chart-computation or geocoding error.
    #[error("Astro error: {0}")]
    Astro(#[from] AstroError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The caller may not perform this operation yet (e.g. fetching a
    /// result before payment is verified).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{id}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Upstream services ---
            AppError::Gateway(err) => {
                tracing::error!(error = %err, "Payment provider error");
                (
                    StatusCode::BAD_GATEWAY,
                    "PAYMENT_PROVIDER_ERROR",
                    "The payment provider could not be reached".to_string(),
                )
            }
            AppError::Astro(err) => classify_astro_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an astro-layer error.
///
/// An unresolvable city is the user's typo (400); everything else is an
/// upstream failure (502).
fn classify_astro_error(err: &AstroError) -> (StatusCode, &'static str, String) {
    match err {
        AstroError::CityNotFound(_) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
        }
        other => {
            tracing::error!(error = %other, "Astro service error");
            (
                StatusCode::BAD_GATEWAY,
                "ASTRO_SERVICE_ERROR",
                "The chart service could not be reached".to_string(),
            )
        }
    }
}
