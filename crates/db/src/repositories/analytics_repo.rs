//! Read-only analytics queries for the admin usage export.

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use drawstory_core::types::{DbId, Timestamp};

/// One row of the usage export: a (user, project) pair with activity stats.
///
/// `active_scenes` counts non-deleted scenes only; `last_scene_created_at`
/// considers all scenes, deleted or not, matching what the authors see as
/// "last activity".
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UsageRow {
    pub user_email: String,
    pub last_login: Option<Timestamp>,
    pub project_id: DbId,
    pub project_title: String,
    pub project_created_at: Timestamp,
    pub project_updated_at: Timestamp,
    pub active_scenes: i64,
    pub last_scene_created_at: Option<Timestamp>,
}

/// Provides aggregate usage queries for the admin analytics export.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Per-project usage rows across all users, newest projects first within
    /// each user. Users without projects contribute no rows.
    pub async fn usage_rows(pool: &PgPool) -> Result<Vec<UsageRow>, sqlx::Error> {
        sqlx::query_as::<_, UsageRow>(
            "SELECT \
                u.email AS user_email, \
                u.last_login_at AS last_login, \
                p.id AS project_id, \
                p.title AS project_title, \
                p.created_at AS project_created_at, \
                p.updated_at AS project_updated_at, \
                (SELECT COUNT(*) FROM scenes s \
                    WHERE s.project_id = p.id AND s.is_deleted = false) AS active_scenes, \
                (SELECT MAX(s.created_at) FROM scenes s \
                    WHERE s.project_id = p.id) AS last_scene_created_at \
             FROM users u \
             JOIN projects p ON p.author_id = u.id \
             ORDER BY u.email ASC, p.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }
}
