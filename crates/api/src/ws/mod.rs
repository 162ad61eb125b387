//! WebSocket infrastructure for real-time availability updates.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handler used by Axum routes. Connections are anonymous
//! subscribers: every client receives every stand event frame and resyncs
//! from the catalog read when it detects a version gap.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
