//! Repository for the `stands` catalog table.

use expo_core::types::DbId;
use sqlx::PgPool;

use crate::models::stand::{CreateStand, Stand, StandWithClaim};

/// Column list for `stands` queries.
const COLUMNS: &str = "id, code, category, area_sqm, price_cents, created_at, updated_at";

/// Columns for the stand + claim projection join.
const JOINED_COLUMNS: &str = "\
    s.id, s.code, s.category, s.area_sqm, s.price_cents, \
    c.status_id, c.holder_token, c.acquired_at, c.expires_at, c.note, c.version";

/// Provides catalog reads and the provisioning insert.
pub struct StandRepo;

impl StandRepo {
    /// Insert a new catalog entry. Runs inside the provisioning transaction
    /// so the stand and its claim row appear atomically.
    pub async fn create(
        conn: &mut sqlx::PgConnection,
        input: &CreateStand,
    ) -> Result<Stand, sqlx::Error> {
        let query = format!(
            "INSERT INTO stands (code, category, area_sqm, price_cents) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stand>(&query)
            .bind(&input.code)
            .bind(&input.category)
            .bind(input.area_sqm)
            .bind(input.price_cents)
            .fetch_one(conn)
            .await
    }

    /// Find a stand by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Stand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stands WHERE id = $1");
        sqlx::query_as::<_, Stand>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a stand by its floor label.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Stand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stands WHERE code = $1");
        sqlx::query_as::<_, Stand>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List the full catalog joined with current claim state, ordered by
    /// floor label. This is the projection clients render and resync from.
    pub async fn list_with_claims(pool: &PgPool) -> Result<Vec<StandWithClaim>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} \
             FROM stands s \
             JOIN stand_claims c ON c.stand_id = s.id \
             ORDER BY s.code ASC"
        );
        sqlx::query_as::<_, StandWithClaim>(&query)
            .fetch_all(pool)
            .await
    }

    /// Read a single stand joined with its claim state.
    pub async fn find_with_claim(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StandWithClaim>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} \
             FROM stands s \
             JOIN stand_claims c ON c.stand_id = s.id \
             WHERE s.id = $1"
        );
        sqlx::query_as::<_, StandWithClaim>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
