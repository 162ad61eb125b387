//! Route definitions for the `/admin` back-office subtree.
//!
//! Mounted separately from the public flow so an external authentication
//! layer can wrap the whole subtree.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /stands                       -> list_stands
/// POST   /stands                       -> create_stand
/// POST   /stands/{id}/approve          -> approve_stand
/// POST   /stands/{id}/reject           -> reject_stand
/// POST   /stands/{id}/force-release    -> force_release_stand
/// GET    /stands/{id}/events           -> stand_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stands", get(admin::list_stands).post(admin::create_stand))
        .route("/stands/{id}/approve", post(admin::approve_stand))
        .route("/stands/{id}/reject", post(admin::reject_stand))
        .route("/stands/{id}/force-release", post(admin::force_release_stand))
        .route("/stands/{id}/events", get(admin::stand_events))
}
