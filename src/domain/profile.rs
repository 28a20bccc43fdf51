use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{DisplayName, ImageUrl, ProfileBio, UserId};

/// Public-facing author information, keyed by the auth-service account id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub display_name: DisplayName,
    pub bio: Option<ProfileBio>,
    pub avatar_url: Option<ImageUrl>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fields a user may change about their own profile. Applied as an upsert,
/// so the same payload creates the profile on first save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    pub display_name: DisplayName,
    pub bio: Option<ProfileBio>,
    pub avatar_url: Option<ImageUrl>,
}
