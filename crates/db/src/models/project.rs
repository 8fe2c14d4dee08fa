//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use drawstory_core::types::{DbId, Timestamp};

use crate::models::scene::{CreateScene, Scene, SceneDescriptor};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    /// Mirrors the first scene's image at creation time; not auto-synced.
    pub image_url: String,
    pub author_id: DbId,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Lightweight project row for list views (no author, no scenes).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSummary {
    pub id: DbId,
    pub title: String,
    pub image_url: String,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project together with its active scenes, ordered by index.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithScenes {
    #[serde(flatten)]
    pub project: Project,
    pub scenes: Vec<Scene>,
}

/// DTO for the project creation flow.
///
/// `scenes` must be non-empty; the project's cover image is derived from
/// `scenes[0].image_url`. `id` lets a client that generated the project id
/// before its upload completed retry idempotently.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub id: Option<DbId>,
    pub title: String,
    pub author_id: DbId,
    pub scenes: Vec<CreateScene>,
}

/// DTO for a partial project update. `None` leaves the stored value
/// unchanged; an explicit value (including the empty string) overwrites.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub image_url: Option<String>,
}

/// Desired full state of a project for the save (reconciliation) operation.
///
/// `scenes` is the complete desired ordered list: descriptors with an id
/// update existing scenes, descriptors without an id insert new ones at
/// their list position. Stored scenes missing from the list are left
/// untouched -- removal happens only via an explicit `is_deleted: true`
/// descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveProject {
    pub id: DbId,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub scenes: Vec<SceneDescriptor>,
}
