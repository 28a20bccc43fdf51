//! Author profiles.

use crate::cache::QueryCache;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::profile::Profile;
use crate::domain::types::UserId;
use crate::forms::profiles::UpdateProfileFormPayload;
use crate::repository::{ProfileReader, ProfileWriter};

use super::{ServiceError, ServiceResult};

/// Fetches the profile shown on an author page. `None` means the user has
/// never saved one, which readers render with defaults.
pub fn get_profile<R: ProfileReader>(user_id: &str, repo: &R) -> ServiceResult<Option<Profile>> {
    let user_id = UserId::new(user_id.to_string()).map_err(|_| ServiceError::NotFound)?;

    match repo.get_profile(&user_id) {
        Ok(profile) => Ok(profile),
        Err(e) => {
            log::error!("Failed to get profile: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Creates or updates the caller's own profile.
pub fn update_profile<R: ProfileWriter>(
    payload: UpdateProfileFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<Profile> {
    let user_id = UserId::new(user.id.clone()).map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;

    match repo.upsert_profile(&user_id, &payload.into_update()) {
        Ok(profile) => {
            cache.clear();
            Ok(profile)
        }
        Err(e) => {
            log::error!("Failed to upsert profile: {e}");
            Err(ServiceError::Internal)
        }
    }
}
