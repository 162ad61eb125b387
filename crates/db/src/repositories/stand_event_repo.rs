//! Repository for the `stand_events` audit table.

use expo_core::types::DbId;
use sqlx::PgPool;

use crate::models::stand_event::StandEventRow;
use crate::models::status::StatusId;

/// Column list for `stand_events` queries.
const COLUMNS: &str = "\
    id, stand_id, event_type, old_status_id, new_status_id, holder_token, \
    version, payload, created_at, updated_at";

/// Default page size for the audit listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for the audit listing.
const MAX_LIMIT: i64 = 200;

/// Append-only persistence for accepted claim transitions.
pub struct StandEventRepo;

impl StandEventRepo {
    /// Append one event row.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        pool: &PgPool,
        stand_id: DbId,
        event_type: &str,
        old_status_id: StatusId,
        new_status_id: StatusId,
        holder_token: Option<&str>,
        version: i64,
        payload: &serde_json::Value,
    ) -> Result<StandEventRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO stand_events \
                 (stand_id, event_type, old_status_id, new_status_id, \
                  holder_token, version, payload) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StandEventRow>(&query)
            .bind(stand_id)
            .bind(event_type)
            .bind(old_status_id)
            .bind(new_status_id)
            .bind(holder_token)
            .bind(version)
            .bind(payload)
            .fetch_one(pool)
            .await
    }

    /// List a stand's transition history, newest first.
    pub async fn list_for_stand(
        pool: &PgPool,
        stand_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<StandEventRow>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let query = format!(
            "SELECT {COLUMNS} FROM stand_events \
             WHERE stand_id = $1 \
             ORDER BY version DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, StandEventRow>(&query)
            .bind(stand_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
