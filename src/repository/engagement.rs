use chrono::Utc;
use diesel::prelude::*;

use crate::domain::post::Post;
use crate::domain::types::{PostId, UserId};
use crate::models::engagement::{NewLike, NewReadingListEntry};
use crate::models::post::Post as DbPost;
use crate::pagination::Pagination;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, EngagementReader, EngagementWriter};

impl EngagementReader for DieselRepository {
    fn count_likes(&self, post_id: PostId) -> RepositoryResult<usize> {
        use crate::schema::likes;

        let mut conn = self.conn()?;

        let total = likes::table
            .filter(likes::post_id.eq(post_id.get()))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        Ok(total)
    }

    fn user_has_liked(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<bool> {
        use crate::schema::likes;

        let mut conn = self.conn()?;

        let liked = diesel::select(diesel::dsl::exists(
            likes::table
                .filter(likes::post_id.eq(post_id.get()))
                .filter(likes::user_id.eq(user_id.as_str())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(liked)
    }

    fn list_reading_list(
        &self,
        user_id: &UserId,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<Post>)> {
        use crate::schema::{posts, reading_list};

        let mut conn = self.conn()?;

        // every entry references an existing post, so the membership table
        // alone carries the total
        let total = reading_list::table
            .filter(reading_list::user_id.eq(user_id.as_str()))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items_query = reading_list::table
            .inner_join(posts::table)
            .filter(reading_list::user_id.eq(user_id.as_str()))
            .order(reading_list::created_at.desc())
            .select(posts::all_columns)
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items_query = items_query
                .offset(offset)
                .limit(pagination.per_page as i64);
        }

        let items = items_query
            .load::<DbPost>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Post>, _>>()?;

        Ok((total, items))
    }
}

impl EngagementWriter for DieselRepository {
    fn like_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize> {
        use crate::schema::likes;

        let mut conn = self.conn()?;

        let row = NewLike {
            post_id: post_id.get(),
            user_id: user_id.as_str().to_string(),
            created_at: Utc::now().naive_utc(),
        };

        // already-liked inserts hit the composite primary key and affect 0 rows
        let affected = diesel::insert_into(likes::table)
            .values(row)
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn unlike_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize> {
        use crate::schema::likes;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            likes::table
                .filter(likes::post_id.eq(post_id.get()))
                .filter(likes::user_id.eq(user_id.as_str())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn save_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize> {
        use crate::schema::reading_list;

        let mut conn = self.conn()?;

        let row = NewReadingListEntry {
            post_id: post_id.get(),
            user_id: user_id.as_str().to_string(),
            created_at: Utc::now().naive_utc(),
        };

        let affected = diesel::insert_into(reading_list::table)
            .values(row)
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn unsave_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize> {
        use crate::schema::reading_list;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            reading_list::table
                .filter(reading_list::post_id.eq(post_id.get()))
                .filter(reading_list::user_id.eq(user_id.as_str())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }
}
