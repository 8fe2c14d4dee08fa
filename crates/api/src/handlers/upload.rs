//! Handler for the scene image upload flow.
//!
//! Images are uploaded before the project row exists: the client posts the
//! files, gets back a project id (its own or a fresh one) plus the public
//! URLs, and then creates the project referencing those URLs. Keys follow
//! `{user_id}/{project_id}/image_{n}{ext}`, numbered from 1 in field order.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use drawstory_core::storage::{file_extension, image_key};
use drawstory_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Response body for `POST /projects/upload-images`.
#[derive(Debug, Serialize)]
pub struct UploadImagesResponse {
    /// The project these images belong to (generated when not supplied).
    pub project_id: DbId,
    /// Public URLs in upload order.
    pub images: Vec<String>,
}

/// POST /projects/upload-images
///
/// Multipart form with any number of `images` file fields and an optional
/// `project_id` text field.
pub async fn upload_images(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<UploadImagesResponse>> {
    let mut project_id: Option<DbId> = None;
    let mut files: Vec<(String, String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("project_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid project_id field: {e}")))?;
                let id = text
                    .parse()
                    .map_err(|_| AppError::BadRequest("project_id must be a UUID".into()))?;
                project_id = Some(id);
            }
            Some("images") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid image field: {e}")))?;
                files.push((filename, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("No images in request".into()));
    }

    let project_id = project_id.unwrap_or_else(Uuid::new_v4);

    let mut images = Vec::with_capacity(files.len());
    for (n, (filename, content_type, bytes)) in files.into_iter().enumerate() {
        let key = image_key(auth.user_id, project_id, n + 1, file_extension(&filename));
        state.storage.put_object(&key, bytes, &content_type).await?;
        images.push(state.storage.url_for(&key));
    }

    tracing::info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        count = images.len(),
        "Images uploaded"
    );
    Ok(Json(UploadImagesResponse { project_id, images }))
}
