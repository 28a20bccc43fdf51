//! Object storage for uploaded images.

use std::time::SystemTime;

use thiserror::Error;

pub mod filesystem;

pub use filesystem::FsObjectStore;

/// Errors surfaced by object storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A non-overwriting put found the key already taken.
    #[error("object already exists: {0}")]
    AlreadyExists(String),
    /// The key is empty or would escape the store's namespace.
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Listing entry returned by [`ObjectStorage::list_objects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub created_at: SystemTime,
}

/// Blob store holding uploaded files under hierarchical `a/b/c` string keys.
///
/// One instance corresponds to one bucket.
pub trait ObjectStorage {
    /// Store `bytes` under `key`. With `overwrite` unset, an existing object
    /// under the same key fails the call with [`StorageError::AlreadyExists`].
    fn put_object(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
        overwrite: bool,
    ) -> StorageResult<()>;
    /// List objects directly under `prefix`.
    fn list_objects(&self, prefix: &str) -> StorageResult<Vec<StoredObject>>;
    /// Remove the given objects, returning how many actually existed.
    fn remove_objects(&self, keys: &[String]) -> StorageResult<usize>;
    /// Public URL the object is served under.
    fn public_url(&self, key: &str) -> String;
}
