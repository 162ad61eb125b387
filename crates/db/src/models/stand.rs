//! Stand catalog entity model and DTOs.
//!
//! Catalog facts are immutable as far as the reservation coordinator is
//! concerned; only the paired `stand_claims` row ever changes.

use expo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `stands` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Stand {
    pub id: DbId,
    /// Human-meaningful floor label, e.g. `"A-12"`. Unique.
    pub code: String,
    pub category: String,
    pub area_sqm: f64,
    pub price_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for provisioning a new stand via `POST /api/v1/admin/stands`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStand {
    pub code: String,
    pub category: String,
    pub area_sqm: f64,
    pub price_cents: i64,
}

/// A stand joined with its current claim row, as read for projections.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StandWithClaim {
    pub id: DbId,
    pub code: String,
    pub category: String,
    pub area_sqm: f64,
    pub price_cents: i64,
    pub status_id: StatusId,
    pub holder_token: Option<String>,
    pub acquired_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub note: Option<String>,
    pub version: i64,
}
