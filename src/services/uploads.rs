//! Image upload pipeline: validate, recompress, store, clean up.

use std::thread;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{ImageUrl, UploadPurpose, UserId};
use crate::imaging::{self, UploadFile};
use crate::models::config::UploadConfig;
use crate::storage::{ObjectStorage, StorageResult};

use super::{ServiceError, ServiceResult};

/// Where an upload currently stands. Callers start at [`UploadPhase::Idle`];
/// the service reports every later transition through its phase callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Uploading,
    Processing,
    Success,
    Error,
}

/// A stored upload: its storage key and the URL it is served under.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub key: String,
    pub url: ImageUrl,
}

/// Validates, recompresses and stores one image upload.
///
/// Rejected files never reach storage. Stored objects get a fresh
/// collision-free key, so an upload never replaces an earlier one; stale
/// uploads are pruned afterwards by a detached cleanup task that keeps the
/// newest `config.keep_per_purpose` objects for the user and purpose.
pub fn upload_image<S, F>(
    file: UploadFile,
    user: &AuthenticatedUser,
    purpose: UploadPurpose,
    storage: &S,
    config: &UploadConfig,
    mut on_phase: F,
) -> ServiceResult<UploadedImage>
where
    S: ObjectStorage + Clone + Send + 'static,
    F: FnMut(UploadPhase),
{
    if let Err(e) = imaging::validate(&file, &config.image) {
        on_phase(UploadPhase::Error);
        return Err(ServiceError::InvalidFile(e.to_string()));
    }

    on_phase(UploadPhase::Uploading);

    let author = UserId::new(user.id.clone()).map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        on_phase(UploadPhase::Error);
        ServiceError::Internal
    })?;

    let file = imaging::process(file, &config.image);
    let key = object_key(&author, purpose, &file.content_type);

    if let Err(e) = storage.put_object(&key, &file.bytes, &file.content_type, false) {
        log::error!("Failed to store upload at {key}: {e}");
        on_phase(UploadPhase::Error);
        return Err(ServiceError::UploadFailed(e.to_string()));
    }

    on_phase(UploadPhase::Processing);

    let url = match ImageUrl::new(storage.public_url(&key)) {
        Ok(url) => url,
        Err(e) => {
            log::error!("Storage returned an unusable public url for {key}: {e}");
            on_phase(UploadPhase::Error);
            return Err(ServiceError::UploadFailed(e.to_string()));
        }
    };

    // Detached on purpose: upload success does not depend on cleanup.
    drop(spawn_cleanup(
        storage.clone(),
        author,
        purpose,
        config.keep_per_purpose,
    ));

    on_phase(UploadPhase::Success);
    Ok(UploadedImage { key, url })
}

/// Runs [`cleanup_user_uploads`] on a background thread.
pub fn spawn_cleanup<S>(
    storage: S,
    user_id: UserId,
    purpose: UploadPurpose,
    keep: usize,
) -> thread::JoinHandle<()>
where
    S: ObjectStorage + Send + 'static,
{
    thread::spawn(move || {
        if let Err(e) = cleanup_user_uploads(&storage, &user_id, purpose, keep) {
            log::warn!("Cleanup of {purpose} uploads for {user_id} failed: {e}");
        }
    })
}

/// Removes a user's stale uploads for one purpose, keeping the `keep` newest.
///
/// Ordering is by creation time, newest first, with the key as tie-breaker so
/// same-timestamp objects prune deterministically. Returns how many objects
/// were removed.
pub fn cleanup_user_uploads<S: ObjectStorage>(
    storage: &S,
    user_id: &UserId,
    purpose: UploadPurpose,
    keep: usize,
) -> StorageResult<usize> {
    let prefix = format!("{}/{}", user_id.as_str(), purpose.as_str());
    let mut objects = storage.list_objects(&prefix)?;
    if objects.len() <= keep {
        return Ok(0);
    }

    objects.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.key.cmp(&a.key))
    });
    let stale: Vec<String> = objects.into_iter().skip(keep).map(|o| o.key).collect();

    storage.remove_objects(&stale)
}

/// Builds a storage key that cannot collide with any existing object:
/// `{user}/{purpose}/{millis}-{nonce}.{ext}`.
///
/// The extension reflects the content type actually being stored, which may
/// differ from the uploaded one after recompression.
fn object_key(user_id: &UserId, purpose: UploadPurpose, content_type: &str) -> String {
    let stamp = Utc::now().timestamp_millis();
    let nonce = Uuid::new_v4().simple().to_string();
    format!(
        "{}/{}/{stamp}-{}.{}",
        user_id.as_str(),
        purpose.as_str(),
        &nonce[..8],
        extension_for(content_type)
    )
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "bin",
    }
}
