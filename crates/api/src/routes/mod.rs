pub mod admin;
pub mod health;
pub mod stands;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  WebSocket event stream
///
/// /stands                              list (public projection)
/// /stands/{id}                         get
/// /stands/{id}/acquire                 take a hold (POST)
/// /stands/{id}/release                 give up a hold (POST)
/// /stands/{id}/touch                   extend a hold (POST)
/// /stands/{id}/convert                 submit application (POST)
///
/// /admin/stands                        list with claims, provision (GET, POST)
/// /admin/stands/{id}/approve           approve application (POST)
/// /admin/stands/{id}/reject            reject application (POST)
/// /admin/stands/{id}/force-release     revert any claim (POST)
/// /admin/stands/{id}/events            transition audit (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/stands", stands::router())
        .nest("/admin", admin::router())
}
