//! Filesystem-backed object store.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use super::{ObjectStorage, StorageError, StorageResult, StoredObject};

/// Object store rooted at a local directory.
///
/// Keys map to paths below `root`; the public URL of an object is
/// `base_url` joined with its key.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
    base_url: String,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve `key` below the root, rejecting segments that could escape it.
    fn object_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let mut path = self.root.clone();
        for segment in key.split('/') {
            if segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains(['\\', ':'])
            {
                return Err(StorageError::InvalidKey(key.to_string()));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

impl ObjectStorage for FsObjectStore {
    fn put_object(
        &self,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
        overwrite: bool,
    ) -> StorageResult<()> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = if overwrite {
            fs::File::create(&path)?
        } else {
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .map_err(|e| {
                    if e.kind() == ErrorKind::AlreadyExists {
                        StorageError::AlreadyExists(key.to_string())
                    } else {
                        StorageError::Io(e)
                    }
                })?
        };
        file.write_all(bytes)?;

        Ok(())
    }

    fn list_objects(&self, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        let dir = self.object_path(prefix)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let prefix = prefix.trim_end_matches('/');
        let mut objects = Vec::new();
        for entry in entries {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            // creation time is unsupported on some filesystems
            let created_at = metadata.created().or_else(|_| metadata.modified())?;
            objects.push(StoredObject {
                key: format!("{prefix}/{name}"),
                created_at,
            });
        }

        Ok(objects)
    }

    fn remove_objects(&self, keys: &[String]) -> StorageResult<usize> {
        let mut removed = 0;
        for key in keys {
            let path = self.object_path(key)?;
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::Io(e)),
            }
        }
        Ok(removed)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }
}
