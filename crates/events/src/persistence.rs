//! Durable event persistence service.
//!
//! [`EventPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and appends every received [`StandEvent`] to the
//! `stand_events` table. It runs as a long-lived background task and shuts
//! down gracefully when the bus sender is dropped.

use expo_core::types::DbId;
use expo_db::repositories::StandEventRepo;
use expo_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::StandEvent;

/// Background service that persists stand events to the database.
pub struct EventPersistence;

impl EventPersistence {
    /// Run the persistence loop.
    ///
    /// Subscribes to the event bus via the provided `receiver` and persists
    /// every event it receives. The loop exits when the channel is closed
    /// (i.e. the [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<StandEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            stand_id = event.stand_id,
                            "Failed to persist event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Event persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Append a single event to the `stand_events` table.
    async fn persist(pool: &DbPool, event: &StandEvent) -> Result<DbId, sqlx::Error> {
        let row = StandEventRepo::insert(
            pool,
            event.stand_id,
            &event.event_type,
            event.old_status.id(),
            event.new_status.id(),
            event.holder_token.as_deref(),
            event.version,
            &event.payload,
        )
        .await?;
        Ok(row.id)
    }
}
