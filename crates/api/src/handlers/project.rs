//! Handlers for the `/projects` resource: creation flow, save
//! reconciliation, and the archive lifecycle.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use drawstory_core::error::CoreError;
use drawstory_core::types::DbId;
use drawstory_db::models::project::{
    CreateProject, ProjectSummary, ProjectWithScenes, SaveProject, UpdateProject,
};
use drawstory_db::models::scene::{CreateScene, SceneDescriptor};
use drawstory_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Request body for `POST /projects`.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Client-generated project id (used when images were uploaded first).
    pub id: Option<DbId>,
    pub title: String,
    pub scenes: Vec<CreateScene>,
}

/// Request body for `PUT /projects/{id}/save` (the id comes from the path).
#[derive(Debug, Deserialize)]
pub struct SaveProjectRequest {
    pub title: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub scenes: Vec<SceneDescriptor>,
}

/// Confirm the project exists (in any deletion state) and belongs to the
/// caller. Missing and foreign projects both surface as 404 so project ids
/// are not probeable.
pub(crate) async fn ensure_owner(
    state: &AppState,
    project_id: DbId,
    user_id: DbId,
) -> AppResult<()> {
    let project = ProjectRepo::find_by_id_include_deleted(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    if project.author_id != user_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }));
    }
    Ok(())
}

/// POST /projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<ProjectWithScenes>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project title must not be empty".into(),
        )));
    }
    if input.scenes.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A project needs at least one scene".into(),
        )));
    }

    let project = ProjectRepo::create_with_scenes(
        &state.pool,
        &CreateProject {
            id: input.id,
            title: input.title,
            author_id: auth.user_id,
            scenes: input.scenes,
        },
    )
    .await?;

    tracing::info!(project_id = %project.project.id, user_id = %auth.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /projects
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<ProjectSummary>>> {
    let projects = ProjectRepo::list_by_author(&state.pool, auth.user_id).await?;
    Ok(Json(projects))
}

/// GET /projects/archived
pub async fn list_archived(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<ProjectSummary>>> {
    let projects = ProjectRepo::list_archived_by_author(&state.pool, auth.user_id).await?;
    Ok(Json(projects))
}

/// GET /projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectWithScenes>> {
    ensure_owner(&state, id, auth.user_id).await?;

    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// PUT /projects/{id}/save
///
/// Reconcile the project against the caller's desired state: patch the
/// project fields, overwrite/insert scenes per descriptor, all in one
/// transaction.
pub async fn save(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SaveProjectRequest>,
) -> AppResult<Json<ProjectWithScenes>> {
    ensure_owner(&state, id, auth.user_id).await?;

    let saved = ProjectRepo::save(
        &state.pool,
        &SaveProject {
            id,
            title: input.title,
            image_url: input.image_url,
            scenes: input.scenes,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    }))?;

    tracing::info!(project_id = %id, scenes = saved.scenes.len(), "Project saved");
    Ok(Json(saved))
}

/// PATCH /projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<ProjectSummary>> {
    ensure_owner(&state, id, auth.user_id).await?;

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /projects/{id} (archive)
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectSummary>> {
    ensure_owner(&state, id, auth.user_id).await?;

    let project = ProjectRepo::soft_delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(project_id = %id, "Project archived");
    Ok(Json(project))
}

/// POST /projects/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectSummary>> {
    ensure_owner(&state, id, auth.user_id).await?;

    let project = ProjectRepo::restore(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(project_id = %id, "Project restored");
    Ok(Json(project))
}
