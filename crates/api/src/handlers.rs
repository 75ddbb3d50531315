//! HTTP handlers for the reading wizard.
//!
//! Handlers only translate HTTP to [`crate::flows`] calls and back; the
//! flow path parameter is resolved here so every operation shares the
//! unknown-flow 404.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use arcana_core::session::ReadingKind;

use crate::error::AppResult;
use crate::flows::{self, CatalogView, ConfigureRequest, FlowView, WelcomeRequest};
use crate::response::DataResponse;
use crate::session::SessionId;
use crate::state::AppState;

/// Wizard state plus the flow's static catalogs.
#[derive(Debug, Serialize)]
pub struct FlowOverview {
    #[serde(flatten)]
    pub view: FlowView,
    pub catalog: CatalogView,
}

/// GET /api/v1/readings/{flow}
pub async fn view(
    State(state): State<AppState>,
    Extension(SessionId(caller)): Extension<SessionId>,
    Path(flow): Path<String>,
) -> AppResult<Json<DataResponse<FlowOverview>>> {
    let kind = ReadingKind::from_str(&flow)?;
    let view = flows::view(&state, caller, kind).await;
    Ok(Json(DataResponse {
        data: FlowOverview {
            view,
            catalog: flows::catalog(kind),
        },
    }))
}

/// POST /api/v1/readings/{flow}/welcome
pub async fn welcome(
    State(state): State<AppState>,
    Extension(SessionId(caller)): Extension<SessionId>,
    Path(flow): Path<String>,
    Json(request): Json<WelcomeRequest>,
) -> AppResult<Json<DataResponse<FlowView>>> {
    let kind = ReadingKind::from_str(&flow)?;
    let view = flows::welcome(&state, caller, kind, request).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/readings/{flow}/configure
pub async fn configure(
    State(state): State<AppState>,
    Extension(SessionId(caller)): Extension<SessionId>,
    Path(flow): Path<String>,
    Json(request): Json<ConfigureRequest>,
) -> AppResult<Json<DataResponse<FlowView>>> {
    let kind = ReadingKind::from_str(&flow)?;
    let view = flows::configure(&state, caller, kind, request).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/readings/{flow}/back
pub async fn back(
    State(state): State<AppState>,
    Extension(SessionId(caller)): Extension<SessionId>,
    Path(flow): Path<String>,
) -> AppResult<Json<DataResponse<FlowView>>> {
    let kind = ReadingKind::from_str(&flow)?;
    let view = flows::back(&state, caller, kind).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/readings/{flow}/checkout
pub async fn checkout(
    State(state): State<AppState>,
    Extension(SessionId(caller)): Extension<SessionId>,
    Path(flow): Path<String>,
) -> AppResult<Json<DataResponse<flows::CheckoutView>>> {
    let kind = ReadingKind::from_str(&flow)?;
    let view = flows::checkout(&state, caller, kind).await?;
    Ok(Json(DataResponse { data: view }))
}

#[derive(Debug, Deserialize)]
pub struct ReturnQuery {
    /// Provider checkout session id substituted into the success URL.
    pub session_id: Option<String>,
}

/// GET /api/v1/readings/{flow}/return
pub async fn payment_return(
    State(state): State<AppState>,
    Extension(SessionId(caller)): Extension<SessionId>,
    Path(flow): Path<String>,
    Query(query): Query<ReturnQuery>,
) -> AppResult<Json<DataResponse<FlowView>>> {
    let kind = ReadingKind::from_str(&flow)?;
    let view = flows::payment_return(&state, caller, kind, query.session_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/readings/{flow}/result
pub async fn result(
    State(state): State<AppState>,
    Extension(SessionId(caller)): Extension<SessionId>,
    Path(flow): Path<String>,
) -> AppResult<Json<DataResponse<flows::ResultView>>> {
    let kind = ReadingKind::from_str(&flow)?;
    let view = flows::result(&state, caller, kind).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/readings/{flow}/export
pub async fn export(
    State(state): State<AppState>,
    Extension(SessionId(caller)): Extension<SessionId>,
    Path(flow): Path<String>,
) -> AppResult<impl IntoResponse> {
    let kind = ReadingKind::from_str(&flow)?;
    let (filename, bytes) = flows::export_pdf(&state, caller, kind).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

/// POST /api/v1/readings/{flow}/reset
pub async fn reset(
    State(state): State<AppState>,
    Extension(SessionId(caller)): Extension<SessionId>,
    Path(flow): Path<String>,
) -> AppResult<Json<DataResponse<FlowView>>> {
    let kind = ReadingKind::from_str(&flow)?;
    let view = flows::reset(&state, caller, kind).await;
    Ok(Json(DataResponse { data: view }))
}
