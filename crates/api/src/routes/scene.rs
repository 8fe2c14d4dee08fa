//! Route definitions for `/scenes`.

use axum::routing::delete;
use axum::Router;

use crate::handlers::scene;
use crate::state::AppState;

/// Routes mounted at `/scenes`.
///
/// ```text
/// DELETE /{id} -> delete (soft-delete)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(scene::delete))
}
