//! Event-to-WebSocket relay.
//!
//! [`StandEventRelay`] subscribes to the event bus and forwards every
//! claim transition to all connected WebSocket clients so their
//! availability projections converge without polling.

use std::sync::Arc;

use axum::extract::ws::Message;
use expo_events::StandEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Forwards stand events to all WebSocket subscribers.
///
/// Holder tokens are stripped from outbound frames: possession of a token
/// controls the hold, and every connected browser receives every frame.
pub struct StandEventRelay {
    ws_manager: Arc<WsManager>,
}

impl StandEventRelay {
    /// Create a relay over the given WebSocket manager.
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the relay loop.
    ///
    /// Subscribes to the event bus via `receiver` and broadcasts each event
    /// as a JSON text frame. When the relay itself lags behind the bus it
    /// tells clients to resync rather than replaying a gapped stream. The
    /// loop exits when the channel is closed (i.e. the
    /// [`EventBus`](expo_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<StandEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.ws_manager.broadcast(Self::frame(&event)).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Stand event relay lagged, requesting resync");
                    self.ws_manager.broadcast(Self::resync_frame()).await;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, stand event relay shutting down");
                    break;
                }
            }
        }
    }

    /// Serialize an event as an outbound text frame, without the holder token.
    ///
    /// Clients track the last-seen `version` per stand: a frame whose
    /// version is not exactly one greater triggers a full catalog re-read.
    fn frame(event: &StandEvent) -> Message {
        let msg = serde_json::json!({
            "type": "stand_event",
            "event_type": event.event_type,
            "stand_id": event.stand_id,
            "old_status": event.old_status,
            "new_status": event.new_status,
            "version": event.version,
            "payload": event.payload,
            "timestamp": event.timestamp,
        });
        Message::Text(msg.to_string().into())
    }

    /// Frame instructing clients to re-read the catalog.
    fn resync_frame() -> Message {
        Message::Text(
            serde_json::json!({ "type": "resync" })
                .to_string()
                .into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expo_db::models::status::ClaimStatus;
    use expo_events::bus::STAND_HELD;

    #[test]
    fn frame_strips_holder_token() {
        let event = StandEvent::new(STAND_HELD, 4, ClaimStatus::Available, ClaimStatus::Held, 2)
            .with_holder("sess-secret");

        let Message::Text(text) = StandEventRelay::frame(&event) else {
            panic!("expected a text frame");
        };
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["type"], "stand_event");
        assert_eq!(value["stand_id"], 4);
        assert_eq!(value["new_status"], "held");
        assert_eq!(value["version"], 2);
        assert!(value.get("holder_token").is_none());
        assert!(!text.contains("sess-secret"));
    }
}
