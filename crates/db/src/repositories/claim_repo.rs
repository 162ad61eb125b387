//! Repository for the `stand_claims` table — the claim store.
//!
//! The only mutation path (besides the provisioning insert) is
//! [`ClaimRepo::try_update`], a conditional write guarded on `version`.
//! Everything the coordinator does is built from that primitive plus
//! plain reads.

use expo_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::claim::{ClaimWrite, StandClaim};
use crate::models::status::ClaimStatus;

/// Column list for `stand_claims` queries.
const COLUMNS: &str = "\
    id, stand_id, status_id, holder_token, acquired_at, expires_at, \
    note, version, created_at, updated_at";

/// Provides reads and the conditional-write primitive for stand claims.
pub struct ClaimRepo;

impl ClaimRepo {
    /// Insert the initial `available` claim row for a freshly provisioned
    /// stand. Runs inside the provisioning transaction.
    pub async fn insert_available(
        conn: &mut sqlx::PgConnection,
        stand_id: DbId,
    ) -> Result<StandClaim, sqlx::Error> {
        let query = format!(
            "INSERT INTO stand_claims (stand_id, status_id) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StandClaim>(&query)
            .bind(stand_id)
            .bind(ClaimStatus::Available.id())
            .fetch_one(conn)
            .await
    }

    /// Read the claim row for a stand.
    pub async fn find_by_stand(
        pool: &PgPool,
        stand_id: DbId,
    ) -> Result<Option<StandClaim>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stand_claims WHERE stand_id = $1");
        sqlx::query_as::<_, StandClaim>(&query)
            .bind(stand_id)
            .fetch_optional(pool)
            .await
    }

    /// Conditionally replace the coordination tuple of a claim.
    ///
    /// The update applies if and only if the stored `version` still equals
    /// `expected_version`; on success the version is incremented by exactly
    /// 1 and the new row is returned. `Ok(None)` means the compare-and-swap
    /// lost to a concurrent writer — the caller re-reads and decides.
    pub async fn try_update(
        pool: &PgPool,
        stand_id: DbId,
        expected_version: i64,
        write: &ClaimWrite<'_>,
    ) -> Result<Option<StandClaim>, sqlx::Error> {
        let query = format!(
            "UPDATE stand_claims \
             SET status_id = $3, holder_token = $4, acquired_at = $5, \
                 expires_at = $6, note = $7, \
                 version = version + 1, updated_at = NOW() \
             WHERE stand_id = $1 AND version = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StandClaim>(&query)
            .bind(stand_id)
            .bind(expected_version)
            .bind(write.status.id())
            .bind(write.holder_token)
            .bind(write.acquired_at)
            .bind(write.expires_at)
            .bind(write.note)
            .fetch_optional(pool)
            .await
    }

    /// List holds whose deadline has passed (the sweeper's scan).
    pub async fn list_expired_holds(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<StandClaim>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stand_claims \
             WHERE status_id = $1 AND expires_at <= $2 \
             ORDER BY expires_at ASC"
        );
        sqlx::query_as::<_, StandClaim>(&query)
            .bind(ClaimStatus::Held.id())
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Find a holder's current live claim, if any.
    ///
    /// A live claim is either a hold whose deadline is still in the future
    /// or a converted application awaiting approval. Expired holds do not
    /// count — they are logically available.
    pub async fn find_live_claim_by_holder(
        pool: &PgPool,
        holder_token: &str,
        now: Timestamp,
    ) -> Result<Option<StandClaim>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stand_claims \
             WHERE holder_token = $1 \
               AND (status_id = $2 AND expires_at > $3 OR status_id = $4) \
             LIMIT 1"
        );
        sqlx::query_as::<_, StandClaim>(&query)
            .bind(holder_token)
            .bind(ClaimStatus::Held.id())
            .bind(now)
            .bind(ClaimStatus::PendingApproval.id())
            .fetch_optional(pool)
            .await
    }
}
