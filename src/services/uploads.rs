//! Multipart spooling. Incoming files are written to the temp upload dir
//! and removed again when the `SpooledFile` drops, whether or not the
//! request that produced them succeeded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use actix_multipart::Multipart;
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// A multipart file field spooled to disk. The temp file is deleted on drop.
#[derive(Debug)]
pub struct SpooledFile {
    path: PathBuf,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
}

impl SpooledFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpooledFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "temp file not removed");
            }
        }
    }
}

/// Parsed multipart form: file parts spooled to disk, text parts in memory
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: HashMap<String, SpooledFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub fn file(&self, name: &str) -> Option<&SpooledFile> {
        self.files.get(name)
    }

    pub fn take_file(&mut self, name: &str) -> Option<SpooledFile> {
        self.files.remove(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Drain a multipart payload. File parts are written to `upload_dir` under
/// generated names; any single part exceeding `max_bytes` aborts the parse.
pub async fn spool_multipart(
    mut payload: Multipart,
    upload_dir: &str,
    max_bytes: usize,
) -> Result<UploadForm> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {e}")))?;

    let mut form = UploadForm::default();

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?;

        // Borrow ends here; the field is streamed below.
        let name = field.name().to_string();
        let filename = field
            .content_disposition()
            .get_filename()
            .map(sanitize_filename);

        match filename {
            Some(filename) => {
                let content_type = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let path = Path::new(upload_dir).join(format!("{}-{}", Uuid::new_v4(), filename));
                let mut file = tokio::fs::File::create(&path)
                    .await
                    .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

                // Register before streaming so a failed write still cleans up.
                let mut spooled = SpooledFile {
                    path,
                    filename,
                    content_type,
                    size: 0,
                };

                while let Some(chunk) = field.next().await {
                    let data = chunk
                        .map_err(|e| AppError::BadRequest(format!("Upload read error: {e}")))?;
                    spooled.size += data.len();
                    if spooled.size > max_bytes {
                        return Err(AppError::BadRequest(format!(
                            "File '{}' exceeds the {} byte limit",
                            spooled.filename, max_bytes
                        )));
                    }
                    file.write_all(&data)
                        .await
                        .map_err(|e| AppError::Internal(format!("Failed to write upload: {e}")))?;
                }

                file.flush()
                    .await
                    .map_err(|e| AppError::Internal(format!("Failed to flush upload: {e}")))?;

                form.files.insert(name, spooled);
            }
            None => {
                let mut value = Vec::new();
                while let Some(chunk) = field.next().await {
                    let data = chunk
                        .map_err(|e| AppError::BadRequest(format!("Field read error: {e}")))?;
                    value.extend_from_slice(&data);
                    if value.len() > max_bytes {
                        return Err(AppError::BadRequest(format!("Field '{name}' too large")));
                    }
                }
                let value = String::from_utf8(value)
                    .map_err(|_| AppError::BadRequest(format!("Field '{name}' is not UTF-8")))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

/// Strip path components so a hostile filename cannot escape the upload dir
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        "upload".to_string()
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\evil.exe"), "evil.exe");
        assert_eq!(sanitize_filename("video.mp4"), "video.mp4");
    }

    #[test]
    fn sanitize_rejects_empty_names() {
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename(".."), "upload");
        assert_eq!(sanitize_filename("dir/"), "upload");
    }

    #[test]
    fn spooled_file_removes_temp_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spool-test");
        std::fs::write(&path, b"data").unwrap();

        let spooled = SpooledFile {
            path: path.clone(),
            filename: "spool-test".into(),
            content_type: "application/octet-stream".into(),
            size: 4,
        };
        assert!(path.exists());
        drop(spooled);
        assert!(!path.exists());
    }

    #[test]
    fn spooled_file_drop_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let spooled = SpooledFile {
            path: dir.path().join("never-created"),
            filename: "never-created".into(),
            content_type: "application/octet-stream".into(),
            size: 0,
        };
        drop(spooled);
    }
}
