// Local-disk storage for uploaded incident images

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// URL prefix under which stored images are served
pub const UPLOADS_ROUTE: &str = "/static/uploads";

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Failed to store upload: {0}")]
    Io(#[from] io::Error),
}

/// Writes uploaded images into a single directory
///
/// Stored names are `<uuid>-<sanitized original name>` so two uploads with
/// the same client-side name never overwrite each other, and the client
/// name can never escape the directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the upload directory if it does not exist yet
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Stores `bytes` and returns the public URL of the new file
    pub async fn save(
        &self,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        let stored_name = format!(
            "{}-{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(original_name.unwrap_or_default())
        );

        self.ensure_dir().await?;
        tokio::fs::write(self.dir.join(&stored_name), bytes).await?;

        tracing::debug!(file = %stored_name, size = bytes.len(), "Stored uploaded image");

        Ok(format!("{}/{}", UPLOADS_ROUTE, stored_name))
    }

    /// Removes a file stored by [`ImageStore::save`], given its public URL
    ///
    /// Used when nothing will reference the file. Failures are only logged.
    pub async fn discard(&self, url: &str) {
        let stored_name = url
            .strip_prefix(UPLOADS_ROUTE)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| {
                !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
            });

        let Some(stored_name) = stored_name else {
            tracing::warn!(%url, "Refusing to discard a URL outside the upload directory");
            return;
        };

        match tokio::fs::remove_file(self.dir.join(stored_name)).await {
            Ok(()) => tracing::debug!(file = %stored_name, "Discarded uploaded image"),
            Err(err) => {
                tracing::warn!(file = %stored_name, error = %err, "Failed to discard uploaded image")
            }
        }
    }
}

/// Reduces a client-supplied file name to a safe single path component
///
/// Keeps only the last path segment, replaces anything outside
/// `[A-Za-z0-9._-]` with `_`, strips leading dots and caps the length.
pub fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    let cleaned: String = cleaned.chars().take(MAX_NAME_LEN).collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
