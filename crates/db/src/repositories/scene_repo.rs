//! Repository for the `scenes` table: ordering, append allocation, and
//! soft-delete lifecycle.

use sqlx::{PgPool, Postgres, Transaction};

use drawstory_core::types::DbId;

use crate::models::scene::{AddScene, CreateScene, Scene, SceneDescriptor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, description, voice_over, image_url, \
    original_prompt, index_in_project, is_deleted, created_at, updated_at";

/// Provides scene CRUD, the append-index allocator, and the position /
/// deletion update contract used by project reconciliation.
pub struct SceneRepo;

impl SceneRepo {
    /// Count active (non-deleted) scenes in a project.
    ///
    /// This is the append allocator's source of truth: the next append index
    /// is exactly this count, recomputed per call. Two concurrent appends to
    /// the same project can therefore allocate the same index; readers sort
    /// by index and tolerate duplicates.
    pub async fn count_active(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM scenes WHERE project_id = $1 AND is_deleted = false",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }

    /// List active scenes for a project, ordered by display index.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes \
             WHERE project_id = $1 AND is_deleted = false \
             ORDER BY index_in_project ASC"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Append a single scene to a project.
    ///
    /// When `index` is `None`, allocates `count_active(project)` as the
    /// index. The count and the insert are deliberately not serialized
    /// against concurrent appends (see [`SceneRepo::count_active`]).
    pub async fn add(
        pool: &PgPool,
        project_id: DbId,
        input: &AddScene,
        index: Option<i32>,
    ) -> Result<Scene, sqlx::Error> {
        let index = match index {
            Some(index) => index,
            None => Self::count_active(pool, project_id).await? as i32,
        };

        let query = format!(
            "INSERT INTO scenes \
                (project_id, description, voice_over, image_url, original_prompt, index_in_project) \
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let scene = sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .bind(&input.description)
            .bind(&input.voice_over)
            .bind(&input.image_url)
            .bind(&input.original_prompt)
            .bind(index)
            .fetch_one(pool)
            .await?;

        tracing::debug!(scene_id = %scene.id, %project_id, index, "Scene added");
        Ok(scene)
    }

    /// Append a batch of scenes to a project in one transaction.
    ///
    /// The active-scene count is computed once; the i-th input scene gets
    /// index `count + i`, preserving batch input order.
    pub async fn add_batch(
        pool: &PgPool,
        project_id: DbId,
        scenes: &[CreateScene],
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let base = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM scenes WHERE project_id = $1 AND is_deleted = false",
        )
        .bind(project_id)
        .fetch_one(&mut *tx)
        .await? as i32;

        let mut created = Vec::with_capacity(scenes.len());
        for (offset, scene) in scenes.iter().enumerate() {
            let query = format!(
                "INSERT INTO scenes \
                    (project_id, description, voice_over, image_url, original_prompt, index_in_project) \
                 VALUES ($1, COALESCE($2, ''), '', $3, $4, $5) \
                 RETURNING {COLUMNS}"
            );
            let row = sqlx::query_as::<_, Scene>(&query)
                .bind(project_id)
                .bind(&scene.description)
                .bind(&scene.image_url)
                .bind(&scene.original_prompt)
                .bind(base + offset as i32)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }

        tx.commit().await?;
        tracing::debug!(%project_id, base, count = created.len(), "Scene batch added");
        Ok(created)
    }

    /// Insert the no-id branch of a reconciliation descriptor at an explicit
    /// index, inside the caller's transaction.
    pub(crate) async fn insert_descriptor_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        index: i32,
        d: &SceneDescriptor,
    ) -> Result<Scene, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenes \
                (project_id, description, voice_over, image_url, original_prompt, index_in_project) \
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, ''), $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .bind(&d.description)
            .bind(&d.voice_over)
            .bind(&d.image_url)
            .bind(&d.original_prompt)
            .bind(index)
            .fetch_one(&mut **tx)
            .await
    }

    /// Apply the with-id branch of a reconciliation descriptor inside the
    /// caller's transaction.
    ///
    /// Full overwrite: description / voice_over / image_url fall back to the
    /// empty string and `is_deleted` to `false` when absent. Only
    /// `original_prompt` keeps its stored value when not provided. Matches
    /// soft-deleted scenes too, so a descriptor can restore one.
    ///
    /// Errors with `RowNotFound` when the scene id does not exist, which
    /// aborts (rolls back) the whole reconciliation.
    pub(crate) async fn update_descriptor_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        scene_id: DbId,
        index: i32,
        d: &SceneDescriptor,
    ) -> Result<Scene, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET \
                index_in_project = $2, \
                description = COALESCE($3, ''), \
                voice_over = COALESCE($4, ''), \
                image_url = COALESCE($5, ''), \
                is_deleted = COALESCE($6, false), \
                original_prompt = COALESCE($7, original_prompt) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(scene_id)
            .bind(index)
            .bind(&d.description)
            .bind(&d.voice_over)
            .bind(&d.image_url)
            .bind(d.is_deleted)
            .bind(&d.original_prompt)
            .fetch_one(&mut **tx)
            .await
    }

    /// Set a scene's display index. Idempotent; returns `None` if the scene
    /// does not exist.
    pub async fn set_position(
        pool: &PgPool,
        scene_id: DbId,
        index: i32,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query =
            format!("UPDATE scenes SET index_in_project = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Scene>(&query)
            .bind(scene_id)
            .bind(index)
            .fetch_optional(pool)
            .await
    }

    /// Set a scene's deletion flag. Idempotent; returns `None` if the scene
    /// does not exist.
    pub async fn set_deleted(
        pool: &PgPool,
        scene_id: DbId,
        deleted: bool,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("UPDATE scenes SET is_deleted = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Scene>(&query)
            .bind(scene_id)
            .bind(deleted)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a scene. The record stays addressable by id for restore.
    pub async fn soft_delete(pool: &PgPool, scene_id: DbId) -> Result<Option<Scene>, sqlx::Error> {
        Self::set_deleted(pool, scene_id, true).await
    }

    /// Permanently delete a scene. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, scene_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scenes WHERE id = $1")
            .bind(scene_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a scene by id, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenes WHERE id = $1");
        sqlx::query_as::<_, Scene>(&query)
            .bind(scene_id)
            .fetch_optional(pool)
            .await
    }
}
