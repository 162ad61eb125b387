use std::sync::Arc;

use expo_reservations::ReservationCoordinator;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: expo_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// The reservation coordinator — the only mutation path for claims.
    pub coordinator: Arc<ReservationCoordinator>,
    /// Centralized event bus carrying claim transitions.
    pub event_bus: Arc<expo_events::EventBus>,
}
