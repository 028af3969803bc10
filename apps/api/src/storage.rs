use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;

/// Seam over the object store so the upload pipeline can be exercised
/// without S3. `AppState` holds the concrete [`ObjectStore`].
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Uploads a resume file and returns its key and public URL.
    async fn upload_resume(
        &self,
        user_id: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<StoredObject, AppError>;

    /// Best-effort delete, used as the compensating action when the database
    /// write fails after a successful upload. Deletion failure is logged only.
    async fn remove(&self, key: &str);
}

/// Object-store wrapper for resume files.
///
/// Keys are `{user_id}/resumes/{timestamp}-{sanitized name}`, mirroring the
/// layout the rest of the platform expects. Objects are publicly readable
/// under `{public_base_url}/{bucket}/{key}`.
#[derive(Clone)]
pub struct ObjectStore {
    s3: S3Client,
    bucket: String,
    public_base_url: String,
}

/// Handle to a stored resume file: the object key plus its public URL.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
}

impl ObjectStore {
    pub fn new(s3: S3Client, bucket: String, public_base_url: String) -> Self {
        Self {
            s3,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket, key)
    }
}

#[async_trait]
impl FileStore for ObjectStore {
    async fn upload_resume(
        &self,
        user_id: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<StoredObject, AppError> {
        let key = format!(
            "{}/resumes/{}-{}",
            user_id,
            Utc::now().timestamp_millis(),
            sanitize_file_name(file_name)
        );

        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .cache_control("max-age=3600")
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload file: {e}")))?;

        info!("Uploaded resume to s3://{}/{}", self.bucket, key);

        Ok(StoredObject {
            public_url: self.public_url(&key),
            key,
        })
    }

    async fn remove(&self, key: &str) {
        match self
            .s3
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => info!("Removed orphaned upload s3://{}/{}", self.bucket, key),
            Err(e) => warn!("Failed to remove orphaned upload {key}: {e}"),
        }
    }
}

/// Replaces anything outside `[a-zA-Z0-9.-]` with `_` so the original file
/// name can be embedded in an object key.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_passes_safe_names_through() {
        assert_eq!(sanitize_file_name("resume-2024.pdf"), "resume-2024.pdf");
    }

    #[test]
    fn test_sanitize_replaces_spaces_and_unicode() {
        assert_eq!(sanitize_file_name("my resume (final).pdf"), "my_resume__final_.pdf");
        assert_eq!(sanitize_file_name("résumé.pdf"), "r_sum_.pdf");
    }
}
