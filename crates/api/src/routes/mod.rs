pub mod admin;
pub mod auth;
pub mod health;
pub mod oauth;
pub mod project;
pub mod scene;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                    register (public)
/// /auth/login                       login (public)
/// /auth/logout                      logout (requires auth)
///
/// /oauth/google                     Google register-or-login (public)
/// /oauth/google/login               Google login only (public)
///
/// /users/me                         get, patch current user
///
/// /projects                         list, create
/// /projects/archived                list archived projects
/// /projects/upload-images           multipart image upload
/// /projects/{id}                    get, patch, delete (archive)
/// /projects/{id}/save               save reconciliation (PUT)
/// /projects/{id}/restore            un-archive (POST)
/// /projects/{id}/scenes             list, append scene
/// /projects/{id}/scenes/batch       append scene batch (POST)
///
/// /scenes/{id}                      soft-delete scene (DELETE)
///
/// /admin/analytics/export           usage CSV export (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/oauth", oauth::router())
        .nest("/users", user::router())
        .nest("/projects", project::router())
        .nest("/scenes", scene::router())
        .nest("/admin", admin::router())
}
