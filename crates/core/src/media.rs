use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::fs;

use crate::broadcast::media::{mime_from_url, sanitize_file_name};

/// Landing-page sections that may own uploaded images; used as path
/// prefixes so blobs stay attributable to their section.
pub const ASSET_CATEGORIES: &[&str] = &["logo", "banner", "product", "feature", "testimonial", "cta"];

const WRITE_ATTEMPTS: u32 = 3;
const RETRY_BASE_MS: u64 = 500;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("unknown asset category: {0}")]
    UnknownCategory(String),
    #[error("could not store media: {0}")]
    Io(#[from] std::io::Error),
}

/// Disk-backed blob store. Files land under `root` and are served back
/// under `{public_base}/media/…` as long-lived public URLs. Writes get a
/// millisecond-timestamp uniqueness suffix; interrupted writes are retried
/// a few times with a linearly growing pause, anything else fails at once.
/// A failure after a partial write may orphan a blob — there is no cleanup
/// pass.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    public_base: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMedia {
    pub url: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        let public_base = public_base.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            public_base,
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Store a landing-page image under its section prefix, e.g.
    /// `landing/banner-1718000000000.png`.
    pub async fn store_asset(
        &self,
        category: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredMedia, MediaError> {
        if !ASSET_CATEGORIES.contains(&category) {
            return Err(MediaError::UnknownCategory(category.to_string()));
        }

        let extension = original_name
            .rsplit_once('.')
            .map(|(_, ext)| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default();
        let name = format!("{category}-{}{extension}", Utc::now().timestamp_millis());
        self.persist("landing", &name, bytes).await
    }

    /// Store a broadcast attachment as
    /// `whatsapp_media/{millis}-{sanitized original name}`.
    pub async fn store_broadcast_media(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredMedia, MediaError> {
        let base = if original_name.trim().is_empty() {
            "archivo".to_string()
        } else {
            sanitize_file_name(original_name)
        };
        let name = format!("{}-{base}", Utc::now().timestamp_millis());

        let mut stored = self.persist("whatsapp_media", &name, bytes).await?;
        if let Some(content_type) = content_type {
            stored.mime_type = Some(content_type.to_string());
        }
        Ok(stored)
    }

    async fn persist(
        &self,
        folder: &str,
        name: &str,
        bytes: &[u8],
    ) -> Result<StoredMedia, MediaError> {
        let dir = self.root.join(folder);
        fs::create_dir_all(&dir).await?;
        let path = dir.join(name);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match fs::write(&path, bytes).await {
                Ok(()) => break,
                Err(error)
                    if error.kind() == ErrorKind::Interrupted && attempt < WRITE_ATTEMPTS =>
                {
                    tracing::warn!(attempt, %error, path = %path.display(), "media write interrupted, retrying");
                    tokio::time::sleep(Duration::from_millis(RETRY_BASE_MS * attempt as u64)).await;
                }
                Err(error) => return Err(error.into()),
            }
        }

        let url = format!("{}/media/{folder}/{name}", self.public_base);
        Ok(StoredMedia {
            mime_type: mime_from_url(&url).map(str::to_string),
            url,
            file_name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> MediaStore {
        MediaStore::new(dir.path(), "http://localhost:3030/")
    }

    #[tokio::test]
    async fn stores_assets_under_their_category_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let stored = store(&dir)
            .store_asset("banner", "hero.PNG", b"png-bytes")
            .await
            .unwrap();

        assert!(stored.url.starts_with("http://localhost:3030/media/landing/banner-"));
        assert!(stored.url.ends_with(".png"));
        assert_eq!(stored.mime_type.as_deref(), Some("image/png"));

        let on_disk = dir.path().join("landing").join(&stored.file_name);
        assert_eq!(std::fs::read(on_disk).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn rejects_unknown_asset_categories() {
        let dir = tempfile::tempdir().unwrap();
        let result = store(&dir).store_asset("malware", "x.png", b"x").await;
        assert!(matches!(result, Err(MediaError::UnknownCategory(_))));
    }

    #[tokio::test]
    async fn broadcast_media_keeps_a_sanitized_version_of_the_name() {
        let dir = tempfile::tempdir().unwrap();
        let stored = store(&dir)
            .store_broadcast_media("foto vacaciones (1).png", Some("image/png"), b"bytes")
            .await
            .unwrap();

        assert!(stored.file_name.ends_with("-foto_vacaciones__1_.png"));
        assert!(stored.url.contains("/media/whatsapp_media/"));
        assert_eq!(stored.mime_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn broadcast_media_without_a_name_gets_a_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let stored = store(&dir)
            .store_broadcast_media("", None, b"bytes")
            .await
            .unwrap();

        assert!(stored.file_name.ends_with("-archivo"));
    }
}
