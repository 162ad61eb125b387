//! Persisted stand event model (append-only audit of accepted transitions).

use expo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `stand_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StandEventRow {
    pub id: DbId,
    pub stand_id: DbId,
    /// Dot-separated event name, e.g. `"stand.held"`.
    pub event_type: String,
    pub old_status_id: StatusId,
    pub new_status_id: StatusId,
    pub holder_token: Option<String>,
    /// Claim version after the transition this event records.
    pub version: i64,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
