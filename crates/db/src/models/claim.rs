//! Stand claim entity model — the mutable coordination record.
//!
//! One row exists per stand, created at provisioning time and never
//! deleted. The `version` column is the compare-and-swap guard: every
//! successful transition increments it by exactly 1.

use expo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::status::{ClaimStatus, StatusId};

/// A row from the `stand_claims` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StandClaim {
    pub id: DbId,
    pub stand_id: DbId,
    pub status_id: StatusId,
    /// Opaque session token of the current holder; `None` when available.
    pub holder_token: Option<String>,
    pub acquired_at: Option<Timestamp>,
    /// Hold deadline; `None` once a claim escalates past `held`.
    pub expires_at: Option<Timestamp>,
    /// Non-authoritative free-text annotation.
    pub note: Option<String>,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StandClaim {
    /// Decode the status column.
    ///
    /// The status id is constrained by a foreign key to `claim_statuses`,
    /// so an unknown id only occurs if the lookup seed and the enum drift.
    pub fn status(&self) -> ClaimStatus {
        ClaimStatus::from_id(self.status_id).unwrap_or(ClaimStatus::Available)
    }

    /// True when this is a hold whose deadline has passed.
    ///
    /// Such a row is logically available: readers and precondition checks
    /// must treat it as free even before the sweeper reverts it.
    pub fn hold_expired(&self, now: Timestamp) -> bool {
        self.status() == ClaimStatus::Held
            && expo_core::reservation::hold_expired(self.expires_at, now)
    }

    /// True when this is a hold that has not yet expired.
    pub fn hold_live(&self, now: Timestamp) -> bool {
        self.status() == ClaimStatus::Held && !self.hold_expired(now)
    }
}

/// The full mutable tuple written by a conditional update.
///
/// Conditional updates always write every coordination field; "keep the old
/// value" is expressed by copying it into the write, which keeps the store
/// primitive free of partial-update variants.
#[derive(Debug, Clone, Copy)]
pub struct ClaimWrite<'a> {
    pub status: ClaimStatus,
    pub holder_token: Option<&'a str>,
    pub acquired_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub note: Option<&'a str>,
}

impl<'a> ClaimWrite<'a> {
    /// The write that returns a claim to the `available` state.
    pub fn available() -> Self {
        Self {
            status: ClaimStatus::Available,
            holder_token: None,
            acquired_at: None,
            expires_at: None,
            note: None,
        }
    }
}
