//! Admin usage analytics export.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use drawstory_core::storage::analytics_key;
use drawstory_db::repositories::AnalyticsRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `GET /admin/analytics/export`.
#[derive(Debug, Serialize)]
pub struct AnalyticsExportResponse {
    /// Public URL of the uploaded CSV.
    pub url: String,
    /// Number of data rows in the export.
    pub rows: usize,
}

/// GET /admin/analytics/export
///
/// Build the per-user, per-project usage report, serialize it to CSV, and
/// upload it under the month-partitioned analytics prefix. Re-running on the
/// same day overwrites that day's object.
pub async fn export(
    State(state): State<AppState>,
    admin: AdminUser,
) -> AppResult<Json<DataResponse<AnalyticsExportResponse>>> {
    let rows = AnalyticsRepo::usage_rows(&state.pool).await?;
    let row_count = rows.len();

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in &rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::InternalError(format!("CSV serialization failed: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalError(format!("CSV serialization failed: {e}")))?;

    let key = analytics_key(chrono::Utc::now());
    state.storage.put_object(&key, bytes, "text/csv").await?;
    let url = state.storage.url_for(&key);

    tracing::info!(admin_id = %admin.user_id, rows = row_count, key, "Analytics export uploaded");
    Ok(Json(DataResponse::new(AnalyticsExportResponse {
        url,
        rows: row_count,
    })))
}
