//! Handlers for the `/admin` subtree — organizer back-office operations.
//!
//! Authentication is handled by an outer layer; these routes are mounted
//! under a distinct subtree so that layer can wrap them wholesale. Admin
//! views expose full claim rows, holder tokens included.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use expo_core::types::DbId;
use expo_db::models::stand::CreateStand;
use expo_db::repositories::{StandEventRepo, StandRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the audit listing.
#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    /// Maximum number of results. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
}

/// POST /api/v1/admin/stands
///
/// Provision a stand and its initial `available` claim row. Returns 201
/// with the catalog entry.
pub async fn create_stand(
    State(state): State<AppState>,
    Json(input): Json<CreateStand>,
) -> AppResult<impl IntoResponse> {
    if input.code.trim().is_empty() {
        return Err(AppError::BadRequest("code must not be empty".into()));
    }

    let (stand, _claim) = state.coordinator.provision(&input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: stand })))
}

/// GET /api/v1/admin/stands
///
/// The full catalog with raw claim rows (holder tokens included).
pub async fn list_stands(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = StandRepo::list_with_claims(&state.pool).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/admin/stands/{id}/approve
///
/// Approve a pending application, making the assignment final (`occupied`).
pub async fn approve_stand(
    State(state): State<AppState>,
    Path(stand_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let claim = state.coordinator.approve(stand_id).await?;
    Ok(Json(DataResponse { data: claim }))
}

/// POST /api/v1/admin/stands/{id}/reject
///
/// Reject a pending application, returning the stand to `available`.
pub async fn reject_stand(
    State(state): State<AppState>,
    Path(stand_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let claim = state.coordinator.reject(stand_id).await?;
    Ok(Json(DataResponse { data: claim }))
}

/// POST /api/v1/admin/stands/{id}/force-release
///
/// Return any claim to `available`, including an `occupied` one (e.g. an
/// exhibitor cancellation after approval).
pub async fn force_release_stand(
    State(state): State<AppState>,
    Path(stand_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let claim = state.coordinator.force_release(stand_id).await?;
    Ok(Json(DataResponse { data: claim }))
}

/// GET /api/v1/admin/stands/{id}/events
///
/// A stand's transition history, newest first.
pub async fn stand_events(
    State(state): State<AppState>,
    Path(stand_id): Path<DbId>,
    Query(params): Query<EventListQuery>,
) -> AppResult<impl IntoResponse> {
    let events = StandEventRepo::list_for_stand(&state.pool, stand_id, params.limit).await?;
    Ok(Json(DataResponse { data: events }))
}
