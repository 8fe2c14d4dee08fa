//! Route definitions for `/oauth`.

use axum::routing::post;
use axum::Router;

use crate::handlers::oauth;
use crate::state::AppState;

/// Routes mounted at `/oauth`.
///
/// ```text
/// POST /google       -> register_google (register-or-login)
/// POST /google/login -> login_google (login only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/google", post(oauth::register_google))
        .route("/google/login", post(oauth::login_google))
}
