//! Handlers for scene sub-resources.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use drawstory_core::error::CoreError;
use drawstory_core::types::DbId;
use drawstory_db::models::scene::{AddScene, CreateScene, Scene};
use drawstory_db::repositories::SceneRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::project::ensure_owner;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/scenes/batch`.
#[derive(Debug, Deserialize)]
pub struct AddScenesBatchRequest {
    pub scenes: Vec<CreateScene>,
}

/// GET /projects/{id}/scenes
pub async fn list_for_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Scene>>> {
    ensure_owner(&state, project_id, auth.user_id).await?;

    let scenes = SceneRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(scenes))
}

/// POST /projects/{id}/scenes
///
/// Append a scene; its index is allocated from the current active count.
pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<AddScene>,
) -> AppResult<(StatusCode, Json<Scene>)> {
    ensure_owner(&state, project_id, auth.user_id).await?;

    let scene = SceneRepo::add(&state.pool, project_id, &input, None).await?;

    tracing::info!(project_id = %project_id, scene_id = %scene.id, "Scene added");
    Ok((StatusCode::CREATED, Json(scene)))
}

/// POST /projects/{id}/scenes/batch
///
/// Append several scenes in one transaction; indices are allocated
/// contiguously from the active count at the start of the batch.
pub async fn add_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<AddScenesBatchRequest>,
) -> AppResult<(StatusCode, Json<Vec<Scene>>)> {
    ensure_owner(&state, project_id, auth.user_id).await?;

    if input.scenes.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Scene batch must not be empty".into(),
        )));
    }

    let scenes = SceneRepo::add_batch(&state.pool, project_id, &input.scenes).await?;

    tracing::info!(project_id = %project_id, count = scenes.len(), "Scene batch added");
    Ok((StatusCode::CREATED, Json(scenes)))
}

/// DELETE /scenes/{id}
///
/// Soft-delete a scene. Its index is untouched, leaving a gap in the
/// project's ordering.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Scene>> {
    let scene = SceneRepo::find_by_id_include_deleted(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Scene",
            id,
        }))?;

    ensure_owner(&state, scene.project_id, auth.user_id).await?;

    let scene = SceneRepo::soft_delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Scene",
            id,
        }))?;

    tracing::info!(scene_id = %id, "Scene deleted");
    Ok(Json(scene))
}
