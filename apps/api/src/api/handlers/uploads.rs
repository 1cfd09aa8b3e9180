use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;

/// Name of the multipart part carrying the image
pub const FILE_FIELD: &str = "file";

/// Response from a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub image_url: String,
}

/// A file part from a multipart body
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// A fully buffered multipart form: text fields plus at most one file
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    /// Buffers every part of `multipart`
    ///
    /// An empty `file` part (a form submitted without choosing a file) is
    /// treated as no file. Body-limit violations surface as 413.
    pub async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == FILE_FIELD {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if !bytes.is_empty() {
                    form.file = Some(UploadedFile { file_name, bytes });
                }
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Removes and returns a required text field
    pub fn take_required(&mut self, name: &str) -> Result<String, ApiError> {
        self.fields
            .remove(name)
            .ok_or_else(|| ApiError::bad_request(format!("Missing form field: {}", name)))
    }

    /// Stores the file part, if any, and returns its public URL
    pub async fn store_file(&mut self, state: &AppState) -> Result<Option<String>, ApiError> {
        match self.file.take() {
            Some(file) => {
                let url = state
                    .images
                    .save(file.file_name.as_deref(), &file.bytes)
                    .await?;
                Ok(Some(url))
            }
            None => Ok(None),
        }
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}

/// Upload a standalone image
///
/// POST /upload
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut form = MultipartForm::read(&mut multipart).await?;

    let image_url = form
        .store_file(&state)
        .await?
        .ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

    tracing::info!(user_id = user.id, %image_url, "Image uploaded");

    Ok(Json(UploadResponse { image_url }))
}
