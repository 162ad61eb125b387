//! Stand reservation event bus and change notification infrastructure.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StandEvent`] — the canonical claim-transition event envelope.
//! - [`EventPersistence`] — background service that appends every event to
//!   the `stand_events` audit table.
//!
//! Events are published after a transition commits, never before. Delivery
//! is at-least-once; subscribers that observe a per-stand version gap must
//! resync from the catalog read instead of reordering.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, StandEvent};
pub use persistence::EventPersistence;
