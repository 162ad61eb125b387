//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the fan-out hub for [`StandEvent`]s. It is designed to
//! be shared via `Arc<EventBus>` across the application. The bus itself has
//! no durable state: subscribers resync from the claim store on reconnect.

use chrono::{DateTime, Utc};
use expo_core::types::DbId;
use expo_db::models::status::ClaimStatus;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event type names
// ---------------------------------------------------------------------------

/// A stand and its available claim row were provisioned.
pub const STAND_CREATED: &str = "stand.created";

/// A session acquired a tentative hold.
pub const STAND_HELD: &str = "stand.held";

/// A holder extended its hold deadline.
pub const STAND_TOUCHED: &str = "stand.touched";

/// A holder released its hold.
pub const STAND_RELEASED: &str = "stand.released";

/// The sweeper reclaimed an expired hold.
pub const STAND_HOLD_EXPIRED: &str = "stand.hold_expired";

/// A hold was converted into a submitted application.
pub const STAND_APPLICATION_SUBMITTED: &str = "stand.application_submitted";

/// An administrator approved a pending application.
pub const STAND_APPROVED: &str = "stand.approved";

/// An administrator rejected a pending application.
pub const STAND_REJECTED: &str = "stand.rejected";

/// An administrator forced a claim back to available.
pub const STAND_FORCE_RELEASED: &str = "stand.force_released";

// ---------------------------------------------------------------------------
// StandEvent
// ---------------------------------------------------------------------------

/// A claim transition that was accepted by the store.
///
/// Constructed via [`StandEvent::new`] and enriched with the builder
/// methods [`with_holder`](StandEvent::with_holder) and
/// [`with_payload`](StandEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandEvent {
    /// Dot-separated event name, e.g. `"stand.held"`.
    pub event_type: String,

    /// The stand whose claim changed.
    pub stand_id: DbId,

    /// Claim status before the transition.
    pub old_status: ClaimStatus,

    /// Claim status after the transition.
    pub new_status: ClaimStatus,

    /// Holder token involved in the transition, where one applies.
    ///
    /// Possession of a token controls the hold, so this field is kept out
    /// of frames broadcast to untrusted subscribers (the WebSocket relay
    /// strips it); it is persisted for the audit trail.
    pub holder_token: Option<String>,

    /// Claim version after the transition. Per-stand versions are strictly
    /// monotonic; a subscriber that sees a gap must resync.
    pub version: i64,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl StandEvent {
    /// Create a new event with the required transition facts.
    ///
    /// Holder and payload default to `None` / empty object.
    pub fn new(
        event_type: impl Into<String>,
        stand_id: DbId,
        old_status: ClaimStatus,
        new_status: ClaimStatus,
        version: i64,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            stand_id,
            old_status,
            new_status,
            holder_token: None,
            version,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the holder token involved in the transition.
    pub fn with_holder(mut self, holder_token: impl Into<String>) -> Self {
        self.holder_token = Some(holder_token.into());
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`StandEvent`].
///
/// # Usage
///
/// ```rust
/// use expo_events::bus::{EventBus, StandEvent, STAND_HELD};
/// use expo_db::models::status::ClaimStatus;
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(StandEvent::new(
///     STAND_HELD,
///     7,
///     ClaimStatus::Available,
///     ClaimStatus::Held,
///     2,
/// ));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<StandEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged` — their cue to
    /// resync from the claim store.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    /// The persistence layer (when subscribed) ensures database capture.
    pub fn publish(&self, event: StandEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<StandEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = StandEvent::new(STAND_HELD, 42, ClaimStatus::Available, ClaimStatus::Held, 2)
            .with_holder("sess-abc")
            .with_payload(serde_json::json!({"ttl_secs": 600}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, STAND_HELD);
        assert_eq!(received.stand_id, 42);
        assert_eq!(received.old_status, ClaimStatus::Available);
        assert_eq!(received.new_status, ClaimStatus::Held);
        assert_eq!(received.holder_token.as_deref(), Some("sess-abc"));
        assert_eq!(received.version, 2);
        assert_eq!(received.payload["ttl_secs"], 600);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(StandEvent::new(
            STAND_RELEASED,
            7,
            ClaimStatus::Held,
            ClaimStatus::Available,
            3,
        ));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event_type, STAND_RELEASED);
        assert_eq!(e2.event_type, STAND_RELEASED);
        assert_eq!(e1.version, e2.version);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers — this must not panic.
        bus.publish(StandEvent::new(
            STAND_HOLD_EXPIRED,
            1,
            ClaimStatus::Held,
            ClaimStatus::Available,
            5,
        ));
    }

    #[test]
    fn default_event_has_empty_optional_fields() {
        let event = StandEvent::new(STAND_CREATED, 9, ClaimStatus::Available, ClaimStatus::Available, 1);
        assert!(event.holder_token.is_none());
        assert!(event.payload.is_object());
    }

    #[test]
    fn statuses_serialize_as_snake_case_names() {
        let event = StandEvent::new(
            STAND_APPLICATION_SUBMITTED,
            3,
            ClaimStatus::Held,
            ClaimStatus::PendingApproval,
            4,
        );
        let json = serde_json::to_value(&event).expect("event should serialize");
        assert_eq!(json["old_status"], "held");
        assert_eq!(json["new_status"], "pending_approval");
    }
}
