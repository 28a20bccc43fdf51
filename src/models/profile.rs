use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::profile::Profile as DomainProfile;
use crate::domain::types::{DisplayName, ImageUrl, ProfileBio, TypeConstraintError, UserId};

/// Diesel model representing the `profiles` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::profiles, primary_key(user_id))]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Profile`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::profiles)]
pub struct NewProfile {
    pub user_id: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Profile> for DomainProfile {
    type Error = TypeConstraintError;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(profile.user_id)?,
            display_name: DisplayName::new(profile.display_name)?,
            bio: profile.bio.map(ProfileBio::new).transpose()?,
            avatar_url: profile.avatar_url.map(ImageUrl::new).transpose()?,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        })
    }
}
