use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::storage::{Bucket, ObjectStorage, StorageError, StoredObject};
use crate::profiles::UserId;

const MAX_NAME_LEN: usize = 96;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub bucket: Bucket,
    pub path: String,
    pub url: String,
    pub content_type: String,
    pub size: usize,
}

/// Validates uploads before they reach object storage.
pub struct MediaService<S> {
    storage: Arc<S>,
    max_upload_bytes: usize,
}

impl<S> MediaService<S>
where
    S: ObjectStorage + 'static,
{
    pub fn new(storage: Arc<S>, max_upload_bytes: usize) -> Self {
        Self {
            storage,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Store `bytes` under `<owner>/<sanitised file name>` in `bucket`.
    pub fn upload(
        &self,
        owner: &UserId,
        bucket: Bucket,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(MediaError::TooLarge {
                size: bytes.len(),
                max: self.max_upload_bytes,
            });
        }

        let name = sanitise_file_name(file_name)
            .ok_or_else(|| MediaError::InvalidName(file_name.to_string()))?;
        let content_type = mime_guess::from_path(&name)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        if !bucket.accepts(&content_type) {
            return Err(MediaError::UnsupportedType {
                bucket,
                content_type,
            });
        }

        let path = format!("{owner}/{name}");
        let size = bytes.len();
        let url = self.storage.upload(bucket, &path, bytes, &content_type)?;
        info!(%bucket, %path, size, "stored upload");

        Ok(UploadReceipt {
            bucket,
            path,
            url,
            content_type,
            size,
        })
    }

    pub fn fetch(&self, bucket: Bucket, path: &str) -> Result<StoredObject, MediaError> {
        self.storage
            .fetch(bucket, path)?
            .ok_or_else(|| MediaError::NotFound(format!("{bucket}/{path}")))
    }
}

/// Lowercased name made of ASCII letters, digits, `.`, `-` and `_`; `None` if nothing is left.
pub fn sanitise_file_name(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let mut name = String::with_capacity(base.len());
    for ch in base.trim().chars() {
        let mapped = match ch {
            'a'..='z' | '0'..='9' | '.' | '-' | '_' => ch,
            'A'..='Z' => ch.to_ascii_lowercase(),
            _ => '-',
        };
        if mapped == '-' && name.ends_with('-') {
            continue;
        }
        name.push(mapped);
    }

    let name = name.trim_start_matches(['.', '-']).trim_end_matches('-');
    if name.is_empty() || !name.chars().any(|ch| ch.is_ascii_alphanumeric()) {
        return None;
    }
    // Names are ASCII here, so byte offsets are char boundaries.
    let start = name.len().saturating_sub(MAX_NAME_LEN);
    Some(name[start..].to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("upload is empty")]
    Empty,
    #[error("upload of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },
    #[error("{content_type} files are not accepted in the {bucket} bucket")]
    UnsupportedType { bucket: Bucket, content_type: String },
    #[error("'{0}' is not a usable file name")]
    InvalidName(String),
    #[error("object {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ana, MemoryObjects};

    fn service(max: usize) -> (MediaService<MemoryObjects>, Arc<MemoryObjects>) {
        let storage = Arc::new(MemoryObjects::default());
        (MediaService::new(storage.clone(), max), storage)
    }

    #[test]
    fn file_names_are_sanitised() {
        assert_eq!(
            sanitise_file_name("My Logo (final).PNG").as_deref(),
            Some("my-logo-final-.png")
        );
        assert_eq!(
            sanitise_file_name("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(sanitise_file_name(".env").as_deref(), Some("env"));
        assert_eq!(sanitise_file_name("???"), None);
    }

    #[test]
    fn long_names_keep_their_extension() {
        let raw = format!("{}.pdf", "a".repeat(200));
        let name = sanitise_file_name(&raw).expect("usable name");
        assert_eq!(name.len(), MAX_NAME_LEN);
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn upload_stores_under_owner_prefix() {
        let (service, storage) = service(1024);
        let receipt = service
            .upload(&ana(), Bucket::Logos, "Krishi Logo.png", vec![1, 2, 3])
            .expect("upload succeeds");

        assert_eq!(receipt.path, "ana/krishi-logo.png");
        assert_eq!(receipt.content_type, "image/png");
        assert_eq!(receipt.url, "http://media.test/logos/ana/krishi-logo.png");
        assert_eq!(
            storage
                .fetch(Bucket::Logos, "ana/krishi-logo.png")
                .expect("fetch succeeds")
                .map(|object| object.bytes),
            Some(vec![1, 2, 3])
        );
    }

    #[test]
    fn upload_rejects_bad_payloads() {
        let (service, _) = service(4);
        assert!(matches!(
            service.upload(&ana(), Bucket::Logos, "logo.png", Vec::new()),
            Err(MediaError::Empty)
        ));
        assert!(matches!(
            service.upload(&ana(), Bucket::Logos, "logo.png", vec![0; 5]),
            Err(MediaError::TooLarge { size: 5, max: 4 })
        ));
        assert!(matches!(
            service.upload(&ana(), Bucket::Documents, "deck.png", vec![0; 4]),
            Err(MediaError::UnsupportedType { .. })
        ));
        assert!(matches!(
            service.upload(&ana(), Bucket::Avatars, "face", vec![0; 4]),
            Err(MediaError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn svg_logos_are_refused() {
        let (service, storage) = service(1024);
        let result = service.upload(
            &ana(),
            Bucket::Logos,
            "badge.svg",
            b"<svg onload=alert(1)>".to_vec(),
        );
        assert!(matches!(
            result,
            Err(MediaError::UnsupportedType { bucket: Bucket::Logos, ref content_type })
                if content_type == "image/svg+xml"
        ));
        assert_eq!(
            storage
                .fetch(Bucket::Logos, "ana/badge.svg")
                .expect("fetch succeeds"),
            None
        );
    }

    #[test]
    fn fetch_reports_missing_objects() {
        let (service, _) = service(16);
        assert!(matches!(
            service.fetch(Bucket::Documents, "ana/deck.pdf"),
            Err(MediaError::NotFound(_))
        ));
    }
}
