//! Scene entity model and DTOs.
//!
//! A scene's position (`index_in_project`) and deletion state (`is_deleted`)
//! are independent, directly settable columns -- not a linked list -- so
//! reordering is O(1) per affected scene and never shifts neighbors.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use drawstory_core::types::{DbId, Timestamp};

/// A scene row from the `scenes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scene {
    pub id: DbId,
    pub project_id: DbId,
    pub description: String,
    pub voice_over: String,
    pub image_url: String,
    pub original_prompt: Option<String>,
    /// Display order within the project. Gaps and (under racing appends)
    /// duplicates are tolerated; readers sort ascending.
    pub index_in_project: i32,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a scene in a project-creation or batch-add request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScene {
    pub image_url: String,
    pub description: Option<String>,
    pub original_prompt: Option<String>,
}

/// DTO for a single appended scene.
#[derive(Debug, Clone, Deserialize)]
pub struct AddScene {
    pub image_url: String,
    pub description: Option<String>,
    pub voice_over: Option<String>,
    pub original_prompt: Option<String>,
}

/// Desired state of one scene inside a save (reconciliation) request.
///
/// Field semantics are deliberately asymmetric:
///
/// - `id`: present -> update that scene; absent -> insert a new scene at
///   this position in the list.
/// - `description`, `voice_over`, `image_url`, `is_deleted`: full overwrite.
///   An absent field writes the empty string (or `false`), it does NOT keep
///   the stored value.
/// - `original_prompt`: tri-state. Absent leaves the stored value intact;
///   present overwrites.
///
/// The scene's index is not carried here: it is the descriptor's position in
/// the request list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneDescriptor {
    pub id: Option<DbId>,
    pub description: Option<String>,
    pub voice_over: Option<String>,
    pub image_url: Option<String>,
    pub is_deleted: Option<bool>,
    pub original_prompt: Option<String>,
}
