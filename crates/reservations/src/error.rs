use expo_core::types::DbId;
use expo_db::models::status::ClaimStatus;

/// Failures surfaced by the reservation coordinator.
///
/// Every variant except `Database` is an expected outcome of contention or
/// stale client state; none is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    /// The stand is not available to this caller (held by another session,
    /// pending approval, or occupied). Recoverable by choosing a different
    /// stand; never retried automatically.
    #[error("Stand {stand_id} is not available (currently {})", .status.name())]
    AlreadyClaimed { stand_id: DbId, status: ClaimStatus },

    /// A conditional write lost to a concurrent update. Acquire absorbs one
    /// of these internally; everywhere else it is surfaced so the caller can
    /// re-read and retry deliberately.
    #[error("Stand {stand_id} was modified concurrently, please retry")]
    Conflict { stand_id: DbId },

    /// The caller's token does not match the current holder. Stale local
    /// state — the caller should resync from the catalog read.
    #[error("Holder token does not match the current holder of stand {stand_id}")]
    NotHolder { stand_id: DbId },

    /// The hold's deadline has passed (or the hold was already reclaimed).
    /// The caller must re-acquire.
    #[error("Hold on stand {stand_id} has expired")]
    Expired { stand_id: DbId },

    /// An administrative decision was attempted on a claim that is not
    /// pending approval, or a release on an escalated claim.
    #[error("Stand {stand_id} is {}, not in a valid state for this operation", .status.name())]
    InvalidState { stand_id: DbId, status: ClaimStatus },

    /// Unknown stand id.
    #[error("Stand not found: {stand_id}")]
    NotFound { stand_id: DbId },

    /// The holder already has a live hold or pending application on another
    /// stand and must release or convert it first.
    #[error("Holder already has a live claim on stand {stand_id}")]
    ActiveHoldExists { stand_id: DbId },

    /// Infrastructure failure talking to the claim store.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
