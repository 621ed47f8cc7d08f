//! Logo, avatar and pitch-deck uploads backed by an [`ObjectStorage`] bucket store.

pub mod router;
pub mod service;
pub mod storage;

pub use router::media_router;
pub use service::{sanitise_file_name, MediaError, MediaService, UploadReceipt};
pub use storage::{Bucket, ObjectStorage, StorageError, StoredObject, UnknownBucket};
