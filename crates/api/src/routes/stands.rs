//! Route definitions for the public `/stands` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::stands;
use crate::state::AppState;

/// Routes mounted at `/stands`.
///
/// ```text
/// GET    /                -> list_stands
/// GET    /{id}            -> get_stand
/// POST   /{id}/acquire    -> acquire_stand
/// POST   /{id}/release    -> release_stand
/// POST   /{id}/touch      -> touch_stand
/// POST   /{id}/convert    -> convert_stand
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stands::list_stands))
        .route("/{id}", get(stands::get_stand))
        .route("/{id}/acquire", post(stands::acquire_stand))
        .route("/{id}/release", post(stands::release_stand))
        .route("/{id}/touch", post(stands::touch_stand))
        .route("/{id}/convert", post(stands::convert_stand))
}
