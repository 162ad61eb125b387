//! Integration tests for the claim store's conditional-write primitive.
//!
//! Exercises `ClaimRepo` against a real database: version-guarded updates,
//! the one-row-per-stand constraint, expiry scans, and the schema checks
//! that back the state invariants.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use expo_db::models::claim::ClaimWrite;
use expo_db::models::stand::CreateStand;
use expo_db::models::status::ClaimStatus;
use expo_db::repositories::{ClaimRepo, StandRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_stand(code: &str) -> CreateStand {
    CreateStand {
        code: code.to_string(),
        category: "standard".to_string(),
        area_sqm: 9.0,
        price_cents: 150_000,
    }
}

/// Insert a stand and its available claim row, committing the transaction.
async fn provision(pool: &PgPool, code: &str) -> i64 {
    let mut tx = pool.begin().await.unwrap();
    let stand = StandRepo::create(&mut tx, &new_stand(code)).await.unwrap();
    ClaimRepo::insert_available(&mut tx, stand.id).await.unwrap();
    tx.commit().await.unwrap();
    stand.id
}

fn hold_write<'a>(token: &'a str, expires_in_secs: i64) -> ClaimWrite<'a> {
    let now = Utc::now();
    ClaimWrite {
        status: ClaimStatus::Held,
        holder_token: Some(token),
        acquired_at: Some(now),
        expires_at: Some(now + Duration::seconds(expires_in_secs)),
        note: None,
    }
}

// ---------------------------------------------------------------------------
// Provisioning
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn initial_claim_is_available_at_version_1(pool: PgPool) {
    let stand_id = provision(&pool, "A-1").await;

    let claim = ClaimRepo::find_by_stand(&pool, stand_id)
        .await
        .unwrap()
        .expect("claim row must exist");

    assert_eq!(claim.status(), ClaimStatus::Available);
    assert_eq!(claim.version, 1);
    assert!(claim.holder_token.is_none());
    assert!(claim.acquired_at.is_none());
    assert!(claim.expires_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_claim_row_for_same_stand_is_rejected(pool: PgPool) {
    let stand_id = provision(&pool, "A-1").await;

    let mut conn = pool.acquire().await.unwrap();
    let result = ClaimRepo::insert_available(&mut conn, stand_id).await;

    assert!(result.is_err(), "uq_stand_claims_stand_id must reject");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_stand_code_is_rejected(pool: PgPool) {
    provision(&pool, "A-1").await;

    let mut tx = pool.begin().await.unwrap();
    let result = StandRepo::create(&mut tx, &new_stand("A-1")).await;

    assert!(result.is_err(), "uq_stands_code must reject");
}

// ---------------------------------------------------------------------------
// Conditional update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn conditional_update_with_current_version_succeeds(pool: PgPool) {
    let stand_id = provision(&pool, "A-1").await;

    let updated = ClaimRepo::try_update(&pool, stand_id, 1, &hold_write("sess-x", 600))
        .await
        .unwrap()
        .expect("write against current version must apply");

    assert_eq!(updated.status(), ClaimStatus::Held);
    assert_eq!(updated.holder_token.as_deref(), Some("sess-x"));
    assert_eq!(updated.version, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn conditional_update_with_stale_version_fails(pool: PgPool) {
    let stand_id = provision(&pool, "A-1").await;

    // Move the row to version 2.
    ClaimRepo::try_update(&pool, stand_id, 1, &hold_write("sess-x", 600))
        .await
        .unwrap()
        .unwrap();

    // A competitor still holding version 1 must lose.
    let result = ClaimRepo::try_update(&pool, stand_id, 1, &hold_write("sess-y", 600))
        .await
        .unwrap();
    assert!(result.is_none(), "stale-version write must not apply");

    // And the stored row must be untouched by the losing write.
    let claim = ClaimRepo::find_by_stand(&pool, stand_id).await.unwrap().unwrap();
    assert_eq!(claim.holder_token.as_deref(), Some("sess-x"));
    assert_eq!(claim.version, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn each_accepted_write_increments_version_by_one(pool: PgPool) {
    let stand_id = provision(&pool, "A-1").await;

    let mut expected_version = 1;
    for token in ["sess-a", "sess-b", "sess-c"] {
        let updated =
            ClaimRepo::try_update(&pool, stand_id, expected_version, &hold_write(token, 600))
                .await
                .unwrap()
                .unwrap();
        expected_version += 1;
        assert_eq!(updated.version, expected_version);

        let released =
            ClaimRepo::try_update(&pool, stand_id, expected_version, &ClaimWrite::available())
                .await
                .unwrap()
                .unwrap();
        expected_version += 1;
        assert_eq!(released.version, expected_version);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn store_rejects_hold_without_deadline(pool: PgPool) {
    let stand_id = provision(&pool, "A-1").await;

    let invalid = ClaimWrite {
        status: ClaimStatus::Held,
        holder_token: Some("sess-x"),
        acquired_at: Some(Utc::now()),
        expires_at: None,
        note: None,
    };
    let result = ClaimRepo::try_update(&pool, stand_id, 1, &invalid).await;

    assert!(result.is_err(), "ck_stand_claims_held_complete must reject");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn store_rejects_available_with_holder(pool: PgPool) {
    let stand_id = provision(&pool, "A-1").await;

    let invalid = ClaimWrite {
        status: ClaimStatus::Available,
        holder_token: Some("sess-x"),
        acquired_at: None,
        expires_at: None,
        note: None,
    };
    let result = ClaimRepo::try_update(&pool, stand_id, 1, &invalid).await;

    assert!(result.is_err(), "ck_stand_claims_available_clear must reject");
}

// ---------------------------------------------------------------------------
// Scans
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_hold_scan_only_returns_lapsed_deadlines(pool: PgPool) {
    let lapsed_id = provision(&pool, "A-1").await;
    let live_id = provision(&pool, "A-2").await;
    provision(&pool, "A-3").await; // stays available

    ClaimRepo::try_update(&pool, lapsed_id, 1, &hold_write("sess-a", -5))
        .await
        .unwrap()
        .unwrap();
    ClaimRepo::try_update(&pool, live_id, 1, &hold_write("sess-b", 600))
        .await
        .unwrap()
        .unwrap();

    let expired = ClaimRepo::list_expired_holds(&pool, Utc::now()).await.unwrap();

    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].stand_id, lapsed_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn live_claim_lookup_ignores_expired_holds(pool: PgPool) {
    let stand_id = provision(&pool, "A-1").await;
    let now = Utc::now();

    // Live hold is found.
    ClaimRepo::try_update(&pool, stand_id, 1, &hold_write("sess-a", 600))
        .await
        .unwrap()
        .unwrap();
    let live = ClaimRepo::find_live_claim_by_holder(&pool, "sess-a", now)
        .await
        .unwrap();
    assert!(live.is_some());

    // Expired hold is not.
    ClaimRepo::try_update(&pool, stand_id, 2, &hold_write("sess-a", -5))
        .await
        .unwrap()
        .unwrap();
    let expired = ClaimRepo::find_live_claim_by_holder(&pool, "sess-a", Utc::now())
        .await
        .unwrap();
    assert!(expired.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn live_claim_lookup_includes_pending_approval(pool: PgPool) {
    let stand_id = provision(&pool, "A-1").await;

    ClaimRepo::try_update(&pool, stand_id, 1, &hold_write("sess-a", 600))
        .await
        .unwrap()
        .unwrap();

    let pending = ClaimWrite {
        status: ClaimStatus::PendingApproval,
        holder_token: Some("sess-a"),
        acquired_at: Some(Utc::now()),
        expires_at: None,
        note: Some("awaiting organizer approval"),
    };
    ClaimRepo::try_update(&pool, stand_id, 2, &pending)
        .await
        .unwrap()
        .unwrap();

    let found = ClaimRepo::find_live_claim_by_holder(&pool, "sess-a", Utc::now())
        .await
        .unwrap();
    assert!(found.is_some(), "pending approval counts as a live claim");
}
