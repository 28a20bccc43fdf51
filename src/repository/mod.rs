use serde::Serialize;

use crate::db::{DbConnection, DbPool};
use crate::domain::category::Category;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::profile::{Profile, ProfileUpdate};
use crate::domain::types::{CategoryId, CommentId, PostId, UserId};
use crate::pagination::Pagination;
use crate::repository::errors::RepositoryResult;

pub mod category;
pub mod comment;
pub mod engagement;
pub mod errors;
pub mod post;
pub mod profile;
#[cfg(test)]
pub mod test;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing posts.
///
/// Serializes deterministically, which is what keys the query cache.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostListQuery {
    /// Restrict to published posts.
    pub published_only: bool,
    /// Filter by author.
    pub author_id: Option<UserId>,
    /// Filter by category.
    pub category_id: Option<CategoryId>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl PostListQuery {
    pub fn published(mut self) -> Self {
        self.published_only = true;
        self
    }
    pub fn author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for post entities.
pub trait PostReader {
    /// List posts matching the supplied query parameters, with the total
    /// count before pagination.
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)>;
    /// Retrieve a post by its identifier.
    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>>;
    /// Retrieve a post by its unique slug.
    fn get_post_by_slug(&self, slug: &str) -> RepositoryResult<Option<Post>>;
    /// Check whether any post, published or not, already claims a slug.
    fn slug_exists(&self, slug: &str) -> RepositoryResult<bool>;
}

/// Write operations for post entities.
pub trait PostWriter {
    /// Persist a new post, returning the stored row with its assigned id.
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post>;
    /// Apply owner edits to a post. The slug is never touched.
    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize>;
    /// Flip the published flag.
    fn set_published(&self, id: PostId, published: bool) -> RepositoryResult<usize>;
    /// Delete a post; comments, likes and reading-list rows cascade.
    fn delete_post(&self, id: PostId) -> RepositoryResult<usize>;
}

/// Read-only operations for category entities. Categories are seeded with
/// the schema, so there is no writer side.
pub trait CategoryReader {
    /// List all categories ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Read-only operations for comment entities.
pub trait CommentReader {
    /// List a post's comments, oldest first.
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>>;
    /// Retrieve a comment by its identifier.
    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>>;
}

/// Write operations for comment entities.
pub trait CommentWriter {
    /// Persist a new comment, returning the stored row with its assigned id.
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment>;
    /// Delete a comment along with any replies to it.
    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize>;
}

/// Read-only operations for likes and reading-list entries.
pub trait EngagementReader {
    /// Number of likes on a post.
    fn count_likes(&self, post_id: PostId) -> RepositoryResult<usize>;
    /// Whether the given user has liked the post.
    fn user_has_liked(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<bool>;
    /// Posts the user saved for later, most recently saved first.
    fn list_reading_list(
        &self,
        user_id: &UserId,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<Post>)>;
}

/// Write operations for likes and reading-list entries. All of these are
/// idempotent; the returned count is zero when nothing changed.
pub trait EngagementWriter {
    /// Record a like.
    fn like_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize>;
    /// Remove a like.
    fn unlike_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize>;
    /// Add a post to the user's reading list.
    fn save_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize>;
    /// Remove a post from the user's reading list.
    fn unsave_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize>;
}

/// Read-only operations for user profiles.
pub trait ProfileReader {
    /// Retrieve the profile owned by `user_id`.
    fn get_profile(&self, user_id: &UserId) -> RepositoryResult<Option<Profile>>;
}

/// Write operations for user profiles.
pub trait ProfileWriter {
    /// Create or replace the profile owned by `user_id`, returning the
    /// stored row.
    fn upsert_profile(&self, user_id: &UserId, update: &ProfileUpdate)
    -> RepositoryResult<Profile>;
}
