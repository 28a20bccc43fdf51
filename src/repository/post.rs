use diesel::prelude::*;

use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::types::PostId;
use crate::models::post::{NewPost as DbNewPost, Post as DbPost};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, PostListQuery, PostReader, PostWriter};

impl PostReader for DieselRepository {
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut q = posts::table.into_boxed::<diesel::sqlite::Sqlite>();
            if query.published_only {
                q = q.filter(posts::published.eq(true));
            }
            if let Some(author_id) = &query.author_id {
                q = q.filter(posts::author_id.eq(author_id.as_str()));
            }
            if let Some(category_id) = query.category_id {
                q = q.filter(posts::category_id.eq(category_id.get()));
            }
            q
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items_query = query_builder().order(posts::created_at.desc());

        if let Some(pagination) = &query.pagination {
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

    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let post = posts::table
            .filter(posts::id.eq(id.get()))
            .first::<DbPost>(&mut conn)
            .optional()?;

        Ok(post.map(TryInto::try_into).transpose()?)
    }

    fn get_post_by_slug(&self, slug: &str) -> RepositoryResult<Option<Post>> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let post = posts::table
            .filter(posts::slug.eq(slug))
            .first::<DbPost>(&mut conn)
            .optional()?;

        Ok(post.map(TryInto::try_into).transpose()?)
    }

    fn slug_exists(&self, slug: &str) -> RepositoryResult<bool> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let exists = diesel::select(diesel::dsl::exists(
            posts::table.filter(posts::slug.eq(slug)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }
}

impl PostWriter for DieselRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let db_post: DbNewPost = post.clone().into();
        let created = diesel::insert_into(posts::table)
            .values(db_post)
            .get_result::<DbPost>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let affected = diesel::update(posts::table.filter(posts::id.eq(id.get())))
            .set((
                posts::title.eq(update.title.as_str()),
                posts::content.eq(update.content.as_str()),
                posts::excerpt.eq(update.excerpt.as_ref().map(|e| e.as_str())),
                posts::category_id.eq(update.category_id.map(|c| c.get())),
                posts::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_published(&self, id: PostId, published: bool) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let affected = diesel::update(posts::table.filter(posts::id.eq(id.get())))
            .set((
                posts::published.eq(published),
                posts::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        // comments, likes and reading_list rows go with it via ON DELETE CASCADE
        let affected =
            diesel::delete(posts::table.filter(posts::id.eq(id.get()))).execute(&mut conn)?;

        Ok(affected)
    }
}
