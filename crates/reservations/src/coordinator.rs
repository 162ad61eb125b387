//! The reservation coordinator: atomic claim transitions over the store.

use std::sync::Arc;

use chrono::Utc;
use expo_core::reservation;
use expo_core::types::{DbId, Timestamp};
use expo_db::models::claim::{ClaimWrite, StandClaim};
use expo_db::models::stand::{CreateStand, Stand};
use expo_db::models::status::ClaimStatus;
use expo_db::repositories::{ClaimRepo, StandRepo};
use expo_db::DbPool;
use expo_events::bus::{
    STAND_APPLICATION_SUBMITTED, STAND_APPROVED, STAND_CREATED, STAND_FORCE_RELEASED, STAND_HELD,
    STAND_HOLD_EXPIRED, STAND_REJECTED, STAND_RELEASED, STAND_TOUCHED,
};
use expo_events::{EventBus, StandEvent};

use crate::config::ReservationConfig;
use crate::error::ReservationError;

/// Coordinates exclusive, time-boxed claims on stands.
///
/// Shared via `Arc` between the HTTP handlers and the expiry sweeper. All
/// synchronization is delegated to the claim store's conditional write;
/// the coordinator itself holds no locks.
pub struct ReservationCoordinator {
    pool: DbPool,
    bus: Arc<EventBus>,
    config: ReservationConfig,
}

impl ReservationCoordinator {
    /// Create a coordinator over the given pool and event bus.
    pub fn new(pool: DbPool, bus: Arc<EventBus>, config: ReservationConfig) -> Self {
        Self { pool, bus, config }
    }

    /// The active timing configuration.
    pub fn config(&self) -> &ReservationConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Public operations
    // -----------------------------------------------------------------------

    /// Acquire a tentative hold on a stand.
    ///
    /// Succeeds when the stand is `available` or carries a hold whose
    /// deadline has already passed (expired holds are logically available).
    /// A compare-and-swap loss is retried once against a fresh read; a
    /// second loss means real contention and surfaces as `AlreadyClaimed`.
    pub async fn acquire(
        &self,
        stand_id: DbId,
        holder_token: &str,
        ttl_secs: Option<i64>,
    ) -> Result<StandClaim, ReservationError> {
        let ttl = reservation::clamp_ttl(
            ttl_secs,
            self.config.default_ttl_secs,
            self.config.min_ttl_secs,
            self.config.max_ttl_secs,
        );

        let mut cas_losses = 0;
        loop {
            let now = Utc::now();
            let claim = self.load(stand_id).await?;

            // One live claim per holder: a session must release or convert
            // its current hold before claiming another stand.
            if let Some(existing) =
                ClaimRepo::find_live_claim_by_holder(&self.pool, holder_token, now).await?
            {
                return Err(ReservationError::ActiveHoldExists {
                    stand_id: existing.stand_id,
                });
            }

            let reclaiming_expired = claim.hold_expired(now);
            if claim.status() != ClaimStatus::Available && !reclaiming_expired {
                return Err(ReservationError::AlreadyClaimed {
                    stand_id,
                    status: claim.status(),
                });
            }

            let write = ClaimWrite {
                status: ClaimStatus::Held,
                holder_token: Some(holder_token),
                acquired_at: Some(now),
                expires_at: Some(now + ttl),
                note: None,
            };

            match ClaimRepo::try_update(&self.pool, stand_id, claim.version, &write).await? {
                Some(updated) => {
                    tracing::info!(
                        stand_id,
                        holder = holder_token,
                        version = updated.version,
                        ttl_secs = ttl.num_seconds(),
                        reclaimed_expired = reclaiming_expired,
                        "Hold acquired"
                    );
                    self.bus.publish(
                        StandEvent::new(
                            STAND_HELD,
                            stand_id,
                            claim.status(),
                            ClaimStatus::Held,
                            updated.version,
                        )
                        .with_holder(holder_token)
                        .with_payload(serde_json::json!({
                            "expires_at": updated.expires_at,
                            "reclaimed_expired_hold": reclaiming_expired,
                        })),
                    );
                    return Ok(updated);
                }
                None => {
                    cas_losses += 1;
                    if cas_losses > 1 {
                        // Lost the race twice: whoever keeps beating us owns
                        // the stand now. Report what the winner left behind.
                        let fresh = self.load(stand_id).await?;
                        tracing::debug!(stand_id, holder = holder_token, "Acquire lost CAS twice");
                        return Err(ReservationError::AlreadyClaimed {
                            stand_id,
                            status: fresh.status(),
                        });
                    }
                    // Benign race: re-read and re-validate once.
                    continue;
                }
            }
        }
    }

    /// Release a hold, returning the stand to `available`.
    ///
    /// Idempotent: releasing an already-available stand (including one whose
    /// hold expired and belongs to someone else) succeeds without a write.
    pub async fn release(
        &self,
        stand_id: DbId,
        holder_token: &str,
    ) -> Result<StandClaim, ReservationError> {
        let now = Utc::now();
        let claim = self.load(stand_id).await?;

        match claim.status() {
            ClaimStatus::Available => Ok(claim),
            ClaimStatus::Held => {
                if claim.holder_token.as_deref() == Some(holder_token) {
                    let updated = self
                        .cas(stand_id, claim.version, &ClaimWrite::available())
                        .await?;
                    tracing::info!(
                        stand_id,
                        holder = holder_token,
                        version = updated.version,
                        "Hold released"
                    );
                    self.bus.publish(
                        StandEvent::new(
                            STAND_RELEASED,
                            stand_id,
                            ClaimStatus::Held,
                            ClaimStatus::Available,
                            updated.version,
                        )
                        .with_holder(holder_token),
                    );
                    Ok(updated)
                } else if claim.hold_expired(now) {
                    // Logically available already; the sweeper or the next
                    // acquire will reclaim the row.
                    Ok(claim)
                } else {
                    Err(ReservationError::NotHolder { stand_id })
                }
            }
            status @ (ClaimStatus::PendingApproval | ClaimStatus::Occupied) => {
                Err(ReservationError::InvalidState { stand_id, status })
            }
        }
    }

    /// Extend a live hold's deadline (keep-alive while the holder fills out
    /// the rest of the form).
    pub async fn touch(
        &self,
        stand_id: DbId,
        holder_token: &str,
        ttl_secs: Option<i64>,
    ) -> Result<StandClaim, ReservationError> {
        let ttl = reservation::clamp_ttl(
            ttl_secs,
            self.config.default_ttl_secs,
            self.config.min_ttl_secs,
            self.config.max_ttl_secs,
        );
        let now = Utc::now();
        let claim = self.require_live_hold(stand_id, holder_token, now).await?;

        let write = ClaimWrite {
            status: ClaimStatus::Held,
            holder_token: Some(holder_token),
            acquired_at: claim.acquired_at,
            expires_at: Some(now + ttl),
            note: claim.note.as_deref(),
        };
        let updated = self.cas(stand_id, claim.version, &write).await?;
        tracing::debug!(
            stand_id,
            holder = holder_token,
            version = updated.version,
            "Hold extended"
        );
        self.bus.publish(
            StandEvent::new(
                STAND_TOUCHED,
                stand_id,
                ClaimStatus::Held,
                ClaimStatus::Held,
                updated.version,
            )
            .with_holder(holder_token)
            .with_payload(serde_json::json!({ "expires_at": updated.expires_at })),
        );
        Ok(updated)
    }

    /// Convert a live hold into a submitted application awaiting approval.
    ///
    /// Clears the deadline — converted claims never auto-expire. The
    /// submitted form payload is carried opaquely on the published event
    /// for the downstream application-persistence consumer.
    pub async fn convert_to_application(
        &self,
        stand_id: DbId,
        holder_token: &str,
        note: Option<&str>,
        application: Option<serde_json::Value>,
    ) -> Result<StandClaim, ReservationError> {
        let now = Utc::now();
        let claim = self.require_live_hold(stand_id, holder_token, now).await?;

        let write = ClaimWrite {
            status: ClaimStatus::PendingApproval,
            holder_token: Some(holder_token),
            acquired_at: claim.acquired_at,
            expires_at: None,
            note: Some(note.unwrap_or("awaiting organizer approval")),
        };
        let updated = self.cas(stand_id, claim.version, &write).await?;
        tracing::info!(
            stand_id,
            holder = holder_token,
            version = updated.version,
            "Hold converted to pending application"
        );
        self.bus.publish(
            StandEvent::new(
                STAND_APPLICATION_SUBMITTED,
                stand_id,
                ClaimStatus::Held,
                ClaimStatus::PendingApproval,
                updated.version,
            )
            .with_holder(holder_token)
            .with_payload(application.unwrap_or_else(|| serde_json::json!({}))),
        );
        Ok(updated)
    }

    /// Approve a pending application, making the assignment final.
    ///
    /// Holder and acquisition time are kept on the row for audit.
    pub async fn approve(&self, stand_id: DbId) -> Result<StandClaim, ReservationError> {
        let claim = self.require_pending(stand_id).await?;

        let write = ClaimWrite {
            status: ClaimStatus::Occupied,
            holder_token: claim.holder_token.as_deref(),
            acquired_at: claim.acquired_at,
            expires_at: None,
            note: claim.note.as_deref(),
        };
        let updated = self.cas(stand_id, claim.version, &write).await?;
        tracing::info!(stand_id, version = updated.version, "Application approved");
        let mut event = StandEvent::new(
            STAND_APPROVED,
            stand_id,
            ClaimStatus::PendingApproval,
            ClaimStatus::Occupied,
            updated.version,
        );
        if let Some(holder) = claim.holder_token.as_deref() {
            event = event.with_holder(holder);
        }
        self.bus.publish(event);
        Ok(updated)
    }

    /// Reject a pending application, returning the stand to `available`.
    pub async fn reject(&self, stand_id: DbId) -> Result<StandClaim, ReservationError> {
        let claim = self.require_pending(stand_id).await?;

        let updated = self
            .cas(stand_id, claim.version, &ClaimWrite::available())
            .await?;
        tracing::info!(stand_id, version = updated.version, "Application rejected");
        let mut event = StandEvent::new(
            STAND_REJECTED,
            stand_id,
            ClaimStatus::PendingApproval,
            ClaimStatus::Available,
            updated.version,
        );
        if let Some(holder) = claim.holder_token.as_deref() {
            event = event.with_holder(holder);
        }
        self.bus.publish(event);
        Ok(updated)
    }

    /// Force a claim back to `available` regardless of its current state
    /// (administrator escape hatch, e.g. an exhibitor cancellation after
    /// approval). Idempotent on already-available stands.
    pub async fn force_release(&self, stand_id: DbId) -> Result<StandClaim, ReservationError> {
        let claim = self.load(stand_id).await?;
        if claim.status() == ClaimStatus::Available {
            return Ok(claim);
        }

        let updated = self
            .cas(stand_id, claim.version, &ClaimWrite::available())
            .await?;
        tracing::warn!(
            stand_id,
            old_status = claim.status().name(),
            version = updated.version,
            "Claim force-released"
        );
        let mut event = StandEvent::new(
            STAND_FORCE_RELEASED,
            stand_id,
            claim.status(),
            ClaimStatus::Available,
            updated.version,
        );
        if let Some(holder) = claim.holder_token.as_deref() {
            event = event.with_holder(holder);
        }
        self.bus.publish(event);
        Ok(updated)
    }

    /// Provision a stand and its initial `available` claim row atomically.
    ///
    /// Upstream admin operation, not part of the steady-state protocol.
    pub async fn provision(
        &self,
        input: &CreateStand,
    ) -> Result<(Stand, StandClaim), ReservationError> {
        let mut tx = self.pool.begin().await?;
        let stand = StandRepo::create(&mut tx, input).await?;
        let claim = ClaimRepo::insert_available(&mut tx, stand.id).await?;
        tx.commit().await?;

        tracing::info!(stand_id = stand.id, code = %stand.code, "Stand provisioned");
        self.bus.publish(
            StandEvent::new(
                STAND_CREATED,
                stand.id,
                ClaimStatus::Available,
                ClaimStatus::Available,
                claim.version,
            )
            .with_payload(serde_json::json!({
                "code": stand.code,
                "category": stand.category,
            })),
        );
        Ok((stand, claim))
    }

    /// Revert every expired hold to `available`. Called by the sweeper.
    ///
    /// Each revert is guarded by the version read during the scan, so a
    /// hold that was renewed or converted in between is skipped, not
    /// clobbered. Returns the number of rows reclaimed.
    pub async fn sweep_expired_holds(&self) -> Result<u64, ReservationError> {
        let now = Utc::now();
        let expired = ClaimRepo::list_expired_holds(&self.pool, now).await?;

        let mut reclaimed = 0;
        for claim in expired {
            match ClaimRepo::try_update(
                &self.pool,
                claim.stand_id,
                claim.version,
                &ClaimWrite::available(),
            )
            .await?
            {
                Some(updated) => {
                    tracing::info!(
                        stand_id = claim.stand_id,
                        version = updated.version,
                        "Expired hold reclaimed"
                    );
                    let mut event = StandEvent::new(
                        STAND_HOLD_EXPIRED,
                        claim.stand_id,
                        ClaimStatus::Held,
                        ClaimStatus::Available,
                        updated.version,
                    );
                    if let Some(holder) = claim.holder_token.as_deref() {
                        event = event.with_holder(holder);
                    }
                    self.bus.publish(event);
                    reclaimed += 1;
                }
                None => {
                    // The row moved between the scan and the write (renewed,
                    // converted, or reclaimed by an acquire). Nothing to do.
                    tracing::debug!(stand_id = claim.stand_id, "Sweep skipped moved hold");
                }
            }
        }
        Ok(reclaimed)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Read a claim or fail with `NotFound`.
    async fn load(&self, stand_id: DbId) -> Result<StandClaim, ReservationError> {
        ClaimRepo::find_by_stand(&self.pool, stand_id)
            .await?
            .ok_or(ReservationError::NotFound { stand_id })
    }

    /// Conditional write that surfaces a CAS loss as `Conflict`.
    async fn cas(
        &self,
        stand_id: DbId,
        expected_version: i64,
        write: &ClaimWrite<'_>,
    ) -> Result<StandClaim, ReservationError> {
        ClaimRepo::try_update(&self.pool, stand_id, expected_version, write)
            .await?
            .ok_or(ReservationError::Conflict { stand_id })
    }

    /// Precondition for touch/convert: a live hold owned by the caller.
    ///
    /// An `available` stand means the hold is gone (expired and reclaimed),
    /// so the caller gets `Expired` and must re-acquire; an escalated claim
    /// is `InvalidState`; a foreign live hold is `NotHolder`.
    async fn require_live_hold(
        &self,
        stand_id: DbId,
        holder_token: &str,
        now: Timestamp,
    ) -> Result<StandClaim, ReservationError> {
        let claim = self.load(stand_id).await?;
        match claim.status() {
            ClaimStatus::Available => Err(ReservationError::Expired { stand_id }),
            ClaimStatus::Held => {
                if claim.holder_token.as_deref() != Some(holder_token) {
                    Err(ReservationError::NotHolder { stand_id })
                } else if claim.hold_expired(now) {
                    Err(ReservationError::Expired { stand_id })
                } else {
                    Ok(claim)
                }
            }
            status @ (ClaimStatus::PendingApproval | ClaimStatus::Occupied) => {
                Err(ReservationError::InvalidState { stand_id, status })
            }
        }
    }

    /// Precondition for approve/reject: the claim is pending approval.
    async fn require_pending(&self, stand_id: DbId) -> Result<StandClaim, ReservationError> {
        let claim = self.load(stand_id).await?;
        if claim.status() != ClaimStatus::PendingApproval {
            return Err(ReservationError::InvalidState {
                stand_id,
                status: claim.status(),
            });
        }
        Ok(claim)
    }
}
