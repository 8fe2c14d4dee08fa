//! Repository for the `projects` table: creation flow, save reconciliation,
//! and the soft-delete lifecycle.

use sqlx::{PgPool, Postgres, Transaction};

use drawstory_core::types::DbId;

use crate::models::project::{
    CreateProject, Project, ProjectSummary, ProjectWithScenes, SaveProject, UpdateProject,
};
use crate::models::scene::Scene;
use crate::repositories::SceneRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, image_url, author_id, is_deleted, created_at, updated_at";

/// Column list for lightweight list views.
const SUMMARY_COLUMNS: &str = "id, title, image_url, is_deleted, created_at, updated_at";

/// Scene column list qualified for use inside this repo's queries.
const SCENE_COLUMNS: &str = "id, project_id, description, voice_over, image_url, \
    original_prompt, index_in_project, is_deleted, created_at, updated_at";

/// Provides the project creation flow, save reconciliation, and CRUD.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Atomically create a project and its initial scene batch.
    ///
    /// The project's cover `image_url` is derived from the first scene.
    /// Honors a caller-supplied project id for idempotent client retries.
    /// Scenes get `index_in_project` equal to their input position and an
    /// empty voice-over. All writes happen in one transaction; the created
    /// project is re-read (with scenes, ordered by index) before commit --
    /// a missing re-read surfaces as `RowNotFound`, which under correct
    /// transactional semantics cannot happen and is a defect signal.
    pub async fn create_with_scenes(
        pool: &PgPool,
        input: &CreateProject,
    ) -> Result<ProjectWithScenes, sqlx::Error> {
        let image_url = input
            .scenes
            .first()
            .map(|s| s.image_url.clone())
            .unwrap_or_default();

        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO projects (id, title, image_url, author_id) \
             VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&insert_query)
            .bind(input.id)
            .bind(&input.title)
            .bind(&image_url)
            .bind(input.author_id)
            .fetch_one(&mut *tx)
            .await?;

        for (index, scene) in input.scenes.iter().enumerate() {
            let scene_query = format!(
                "INSERT INTO scenes \
                    (project_id, description, voice_over, image_url, original_prompt, index_in_project) \
                 VALUES ($1, COALESCE($2, ''), '', $3, $4, $5) \
                 RETURNING {SCENE_COLUMNS}"
            );
            sqlx::query_as::<_, Scene>(&scene_query)
                .bind(project.id)
                .bind(&scene.description)
                .bind(&scene.image_url)
                .bind(&scene.original_prompt)
                .bind(index as i32)
                .fetch_one(&mut *tx)
                .await?;
        }

        let created = Self::find_by_id_in_tx(&mut tx, project.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;
        tracing::debug!(
            project_id = %created.project.id,
            scene_count = created.scenes.len(),
            "Project created"
        );
        Ok(created)
    }

    /// Find an active project with its active scenes, ordered by index.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectWithScenes>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND is_deleted = false");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match project {
            Some(project) => {
                let scenes = SceneRepo::list_for_project(pool, project.id).await?;
                Ok(Some(ProjectWithScenes { project, scenes }))
            }
            None => Ok(None),
        }
    }

    /// List a user's active projects, most recently created first.
    pub async fn list_by_author(
        pool: &PgPool,
        author_id: DbId,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM projects \
             WHERE author_id = $1 AND is_deleted = false \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// List a user's archived (soft-deleted) projects.
    pub async fn list_archived_by_author(
        pool: &PgPool,
        author_id: DbId,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM projects \
             WHERE author_id = $1 AND is_deleted = true \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project's title/cover. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists. Matches archived
    /// projects too (deletion state is orthogonal to field updates).
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET \
                title = COALESCE($2, title), \
                image_url = COALESCE($3, image_url) \
             WHERE id = $1 \
             RETURNING {SUMMARY_COLUMNS}"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Reconcile a project against a caller-supplied desired state, in one
    /// transaction.
    ///
    /// 1. Patch the project's title/image_url (only fields present).
    /// 2. For each descriptor at position `i`: with an id, overwrite that
    ///    scene and set its index to `i`; without an id, insert a new scene
    ///    at index `i`.
    /// 3. Re-fetch the active scene list ordered by index and return it.
    ///
    /// Stored scenes absent from the list are left untouched. Any failed
    /// write aborts the whole unit -- no partial save is observable.
    /// Returns `None` (writing nothing) when the project id does not exist.
    pub async fn save(
        pool: &PgPool,
        input: &SaveProject,
    ) -> Result<Option<ProjectWithScenes>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let patch = UpdateProject {
            title: input.title.clone(),
            image_url: input.image_url.clone(),
        };
        let updated = Self::update_in_tx(&mut tx, input.id, &patch).await?;
        if updated.is_none() {
            // Dropping the transaction rolls it back; nothing was written.
            return Ok(None);
        }

        for (index, descriptor) in input.scenes.iter().enumerate() {
            match descriptor.id {
                Some(scene_id) => {
                    SceneRepo::update_descriptor_in_tx(&mut tx, scene_id, index as i32, descriptor)
                        .await?;
                }
                None => {
                    SceneRepo::insert_descriptor_in_tx(&mut tx, input.id, index as i32, descriptor)
                        .await?;
                }
            }
        }

        let saved = Self::find_by_id_in_tx(&mut tx, input.id).await?;
        tx.commit().await?;
        tracing::debug!(
            project_id = %input.id,
            descriptor_count = input.scenes.len(),
            "Project saved"
        );
        Ok(saved)
    }

    /// Soft-delete a project. Idempotent; scenes are not cascaded.
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET is_deleted = true WHERE id = $1 RETURNING {SUMMARY_COLUMNS}"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Restore a soft-deleted project. Idempotent.
    pub async fn restore(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET is_deleted = false WHERE id = $1 RETURNING {SUMMARY_COLUMNS}"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project (scenes cascade). Returns `true` if a
    /// row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a project by id, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Transaction-scoped helpers
    // -----------------------------------------------------------------------

    async fn update_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET \
                title = COALESCE($2, title), \
                image_url = COALESCE($3, image_url) \
             WHERE id = $1 \
             RETURNING {SUMMARY_COLUMNS}"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.image_url)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Active-project + active-scenes read that sees the transaction's own
    /// uncommitted writes.
    async fn find_by_id_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<ProjectWithScenes>, sqlx::Error> {
        let project_query =
            format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND is_deleted = false");
        let project = sqlx::query_as::<_, Project>(&project_query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

        match project {
            Some(project) => {
                let scenes_query = format!(
                    "SELECT {SCENE_COLUMNS} FROM scenes \
                     WHERE project_id = $1 AND is_deleted = false \
                     ORDER BY index_in_project ASC"
                );
                let scenes = sqlx::query_as::<_, Scene>(&scenes_query)
                    .bind(project.id)
                    .fetch_all(&mut **tx)
                    .await?;
                Ok(Some(ProjectWithScenes { project, scenes }))
            }
            None => Ok(None),
        }
    }
}
