//! Object store client. Uploads land under a per-kind folder with a
//! generated key; the public URL is served through the CDN base.

use std::path::Path;

use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use uuid::Uuid;

use crate::config::S3Config;
use crate::error::{AppError, Result};

/// A stored object: the public URL handed to clients and the bucket key
/// kept for later deletion.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub url: String,
    pub key: String,
}

#[derive(Clone)]
pub struct MediaStore {
    client: Client,
    bucket: String,
    cdn_base_url: String,
}

impl MediaStore {
    /// Build an S3 client from the provided configuration.
    pub async fn new(config: &S3Config) -> Result<Self> {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "vidtube-api",
        );

        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &config.endpoint {
            if !endpoint.trim().is_empty() {
                builder = builder.endpoint_url(endpoint);
            }
        }

        Ok(MediaStore {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket_name.clone(),
            cdn_base_url: config.cdn_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload a spooled file under `folder`, returning its URL and key.
    pub async fn upload(
        &self,
        local_path: &Path,
        folder: &str,
        filename: &str,
        content_type: &str,
    ) -> Result<MediaAsset> {
        let key = object_key(folder, filename);

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read upload: {e}")))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload object: {e}")))?;

        let url = format!("{}/{}", self.cdn_base_url, key);
        Ok(MediaAsset { url, key })
    }

    /// Remove an object. Errors propagate; use this where the caller must
    /// know the remote copy is gone before touching local state.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete object {key}: {e}")))?;

        Ok(())
    }

    /// Remove an object, logging instead of failing. For compensation paths
    /// and stale-asset cleanup where the request already succeeded.
    pub async fn delete_best_effort(&self, key: &str) {
        if let Err(e) = self.delete(key).await {
            tracing::warn!(key = %key, error = %e, "orphaned object not deleted");
        }
    }
}

/// `folder/<uuid>.<ext>`, keeping the original extension when present
fn object_key(folder: &str, filename: &str) -> String {
    let id = Uuid::new_v4();
    match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{folder}/{id}.{ext}"),
        _ => format!("{folder}/{id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_keeps_extension() {
        let key = object_key("thumbnails", "cat.png");
        assert!(key.starts_with("thumbnails/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn object_key_without_extension() {
        let key = object_key("videos", "rawfile");
        assert!(key.starts_with("videos/"));
        assert!(!key.contains('.'));
    }

    #[test]
    fn object_keys_are_unique() {
        assert_ne!(object_key("videos", "a.mp4"), object_key("videos", "a.mp4"));
    }
}
