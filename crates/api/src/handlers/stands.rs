//! Handlers for the public `/stands` resource — the exhibitor-facing
//! reservation flow.
//!
//! The holder token is generated client-side per form session and is
//! opaque here; no authentication is performed on it. Public projections
//! never expose another session's token: the optional `holder_token` query
//! parameter only marks which stands are the caller's own.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use expo_core::error::CoreError;
use expo_core::reservation::validate_holder_token;
use expo_core::types::{DbId, Timestamp};
use expo_db::models::claim::StandClaim;
use expo_db::models::stand::StandWithClaim;
use expo_db::models::status::ClaimStatus;
use expo_db::repositories::StandRepo;
use expo_reservations::ReservationError;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Query parameters for catalog reads.
#[derive(Debug, Deserialize)]
pub struct StandListQuery {
    /// The caller's own session token; used only to set `is_mine`.
    pub holder_token: Option<String>,
}

/// Body for `POST /stands/{id}/acquire` and `POST /stands/{id}/touch`.
#[derive(Debug, Deserialize)]
pub struct AcquireRequest {
    pub holder_token: String,
    /// Optional TTL override, clamped to the configured bounds.
    pub ttl_secs: Option<i64>,
}

/// Body for `POST /stands/{id}/release`.
#[derive(Debug, Deserialize)]
pub struct ReleaseRequest {
    pub holder_token: String,
}

/// Body for `POST /stands/{id}/convert`.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub holder_token: String,
    pub note: Option<String>,
    /// The submitted pre-registration form, passed through opaquely to the
    /// downstream application-persistence consumer.
    pub application: Option<serde_json::Value>,
}

/// Public availability projection of one stand.
///
/// A hold whose deadline has passed is presented as `available` — readers
/// must never see a stand as taken when it is logically free.
#[derive(Debug, Serialize)]
pub struct StandView {
    pub id: DbId,
    pub code: String,
    pub category: String,
    pub area_sqm: f64,
    pub price_cents: i64,
    pub status: ClaimStatus,
    pub expires_at: Option<Timestamp>,
    pub version: i64,
    pub is_mine: bool,
}

impl StandView {
    /// Project a joined row for a viewer identified by `viewer_token`.
    fn project(row: &StandWithClaim, viewer_token: Option<&str>, now: Timestamp) -> Self {
        let status = ClaimStatus::from_id(row.status_id).unwrap_or(ClaimStatus::Available);
        let expired = status == ClaimStatus::Held
            && expo_core::reservation::hold_expired(row.expires_at, now);

        let effective_status = if expired { ClaimStatus::Available } else { status };
        let is_mine = !expired
            && effective_status != ClaimStatus::Available
            && viewer_token.is_some()
            && row.holder_token.as_deref() == viewer_token;

        Self {
            id: row.id,
            code: row.code.clone(),
            category: row.category.clone(),
            area_sqm: row.area_sqm,
            price_cents: row.price_cents,
            status: effective_status,
            expires_at: if expired { None } else { row.expires_at },
            version: row.version,
            is_mine,
        }
    }
}

/// The caller's own view of a claim, returned by mutation endpoints.
#[derive(Debug, Serialize)]
pub struct ClaimView {
    pub stand_id: DbId,
    pub status: ClaimStatus,
    pub acquired_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub note: Option<String>,
    pub version: i64,
}

impl From<StandClaim> for ClaimView {
    fn from(claim: StandClaim) -> Self {
        let status = claim.status();
        Self {
            stand_id: claim.stand_id,
            status,
            acquired_at: claim.acquired_at,
            expires_at: claim.expires_at,
            note: claim.note,
            version: claim.version,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog reads
// ---------------------------------------------------------------------------

/// GET /api/v1/stands
///
/// The full catalog joined with live claim state — the projection clients
/// render and resync from after a WebSocket version gap.
pub async fn list_stands(
    State(state): State<AppState>,
    Query(params): Query<StandListQuery>,
) -> AppResult<impl IntoResponse> {
    let rows = StandRepo::list_with_claims(&state.pool).await?;
    let now = Utc::now();
    let views: Vec<StandView> = rows
        .iter()
        .map(|row| StandView::project(row, params.holder_token.as_deref(), now))
        .collect();
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/stands/{id}
pub async fn get_stand(
    State(state): State<AppState>,
    Path(stand_id): Path<DbId>,
    Query(params): Query<StandListQuery>,
) -> AppResult<impl IntoResponse> {
    let row = StandRepo::find_with_claim(&state.pool, stand_id)
        .await?
        .ok_or(AppError::Reservation(ReservationError::NotFound {
            stand_id,
        }))?;
    let view = StandView::project(&row, params.holder_token.as_deref(), Utc::now());
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// Reservation flow
// ---------------------------------------------------------------------------

/// POST /api/v1/stands/{id}/acquire
///
/// Take a tentative, time-boxed hold. Exactly one of any number of
/// concurrent callers succeeds; the rest receive 409 and should pick a
/// different stand.
pub async fn acquire_stand(
    State(state): State<AppState>,
    Path(stand_id): Path<DbId>,
    Json(input): Json<AcquireRequest>,
) -> AppResult<impl IntoResponse> {
    validate_holder_token(&input.holder_token)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let claim = state
        .coordinator
        .acquire(stand_id, &input.holder_token, input.ttl_secs)
        .await?;

    Ok(Json(DataResponse {
        data: ClaimView::from(claim),
    }))
}

/// POST /api/v1/stands/{id}/release
///
/// Give up a hold. Idempotent: releasing an already-available stand
/// succeeds silently.
pub async fn release_stand(
    State(state): State<AppState>,
    Path(stand_id): Path<DbId>,
    Json(input): Json<ReleaseRequest>,
) -> AppResult<impl IntoResponse> {
    validate_holder_token(&input.holder_token)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let claim = state
        .coordinator
        .release(stand_id, &input.holder_token)
        .await?;

    Ok(Json(DataResponse {
        data: ClaimView::from(claim),
    }))
}

/// POST /api/v1/stands/{id}/touch
///
/// Extend a live hold while the exhibitor finishes the rest of the form.
pub async fn touch_stand(
    State(state): State<AppState>,
    Path(stand_id): Path<DbId>,
    Json(input): Json<AcquireRequest>,
) -> AppResult<impl IntoResponse> {
    validate_holder_token(&input.holder_token)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let claim = state
        .coordinator
        .touch(stand_id, &input.holder_token, input.ttl_secs)
        .await?;

    Ok(Json(DataResponse {
        data: ClaimView::from(claim),
    }))
}

/// POST /api/v1/stands/{id}/convert
///
/// Convert a live hold into a submitted application awaiting organizer
/// approval. The hold stops expiring; only approve/reject move it further.
pub async fn convert_stand(
    State(state): State<AppState>,
    Path(stand_id): Path<DbId>,
    Json(input): Json<ConvertRequest>,
) -> AppResult<impl IntoResponse> {
    validate_holder_token(&input.holder_token)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let claim = state
        .coordinator
        .convert_to_application(
            stand_id,
            &input.holder_token,
            input.note.as_deref(),
            input.application,
        )
        .await?;

    Ok(Json(DataResponse {
        data: ClaimView::from(claim),
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
