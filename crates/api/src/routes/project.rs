//! Route definitions for the `/projects` resource.
//!
//! Also nests scene routes under `/projects/{id}/scenes`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{project, scene, upload};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /archived          -> list_archived
/// POST   /upload-images     -> upload_images (multipart)
/// GET    /{id}              -> get_by_id
/// PATCH  /{id}              -> update
/// DELETE /{id}              -> delete (archive)
/// PUT    /{id}/save         -> save
/// POST   /{id}/restore      -> restore
/// GET    /{id}/scenes       -> list_for_project
/// POST   /{id}/scenes       -> add
/// POST   /{id}/scenes/batch -> add_batch
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/archived", get(project::list_archived))
        .route("/upload-images", post(upload::upload_images))
        .route(
            "/{id}",
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
        .route("/{id}/save", put(project::save))
        .route("/{id}/restore", post(project::restore))
        .route("/{id}/scenes", get(scene::list_for_project).post(scene::add))
        .route("/{id}/scenes/batch", post(scene::add_batch))
}
