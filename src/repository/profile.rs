use chrono::Utc;
use diesel::prelude::*;

use crate::domain::profile::{Profile, ProfileUpdate};
use crate::domain::types::UserId;
use crate::models::profile::{NewProfile as DbNewProfile, Profile as DbProfile};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProfileReader, ProfileWriter};

impl ProfileReader for DieselRepository {
    fn get_profile(&self, user_id: &UserId) -> RepositoryResult<Option<Profile>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;

        let profile = profiles::table
            .filter(profiles::user_id.eq(user_id.as_str()))
            .first::<DbProfile>(&mut conn)
            .optional()?;

        Ok(profile.map(TryInto::try_into).transpose()?)
    }
}

impl ProfileWriter for DieselRepository {
    fn upsert_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> RepositoryResult<Profile> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let row = DbNewProfile {
            user_id: user_id.as_str().to_string(),
            display_name: update.display_name.as_str().to_string(),
            bio: update.bio.as_ref().map(|b| b.as_str().to_string()),
            avatar_url: update.avatar_url.as_ref().map(|u| u.as_str().to_string()),
            created_at: now,
            updated_at: now,
        };

        // first save inserts; later saves keep created_at and update the rest
        diesel::insert_into(profiles::table)
            .values(&row)
            .on_conflict(profiles::user_id)
            .do_update()
            .set((
                profiles::display_name.eq(update.display_name.as_str()),
                profiles::bio.eq(update.bio.as_ref().map(|b| b.as_str())),
                profiles::avatar_url.eq(update.avatar_url.as_ref().map(|u| u.as_str())),
                profiles::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        let profile = profiles::table
            .filter(profiles::user_id.eq(user_id.as_str()))
            .first::<DbProfile>(&mut conn)?;

        Ok(profile.try_into()?)
    }
}
