use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Raster formats served back from the public media path. SVG is excluded because it can
/// carry script.
const IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/webp", "image/gif"];

/// Storage buckets used by the wizards' upload fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Logos,
    Avatars,
    Documents,
}

impl Bucket {
    pub const fn label(self) -> &'static str {
        match self {
            Bucket::Logos => "logos",
            Bucket::Avatars => "avatars",
            Bucket::Documents => "documents",
        }
    }

    /// Whether files of `content_type` may be stored in this bucket.
    pub fn accepts(self, content_type: &str) -> bool {
        match self {
            Bucket::Logos | Bucket::Avatars => {
                IMAGE_TYPES.iter().any(|allowed| *allowed == content_type)
            }
            Bucket::Documents => content_type == "application/pdf",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bucket '{0}'")]
pub struct UnknownBucket(pub String);

impl FromStr for Bucket {
    type Err = UnknownBucket;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "logos" => Ok(Bucket::Logos),
            "avatars" => Ok(Bucket::Avatars),
            "documents" => Ok(Bucket::Documents),
            other => Err(UnknownBucket(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Object storage of the hosted backend. `upload` overwrites and returns the public URL.
pub trait ObjectStorage: Send + Sync {
    fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    fn fetch(&self, bucket: Bucket, path: &str) -> Result<Option<StoredObject>, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object storage unavailable: {0}")]
    Unavailable(String),
}
