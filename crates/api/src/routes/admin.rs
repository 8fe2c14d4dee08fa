//! Route definitions for `/admin` (admin-gated via the [`AdminUser`]
//! extractor on each handler).
//!
//! [`AdminUser`]: crate::middleware::AdminUser

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /analytics/export -> export
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/analytics/export", get(analytics::export))
}
