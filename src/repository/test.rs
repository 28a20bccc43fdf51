use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::Utc;

use crate::domain::category::Category;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::profile::{Profile, ProfileUpdate};
use crate::domain::types::{CategoryId, CommentId, PostId, UserId};
use crate::pagination::Pagination;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CategoryReader, CommentReader, CommentWriter, EngagementReader, EngagementWriter,
    PostListQuery, PostReader, PostWriter, ProfileReader, ProfileWriter,
};

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    posts: RefCell<Vec<Post>>,
    categories: Vec<Category>,
    comments: RefCell<Vec<Comment>>,
    likes: RefCell<Vec<(PostId, UserId)>>,
    reading_list: RefCell<Vec<(PostId, UserId)>>,
    profiles: RefCell<HashMap<UserId, Profile>>,
    next_post_id: Cell<i32>,
    next_comment_id: Cell<i32>,
    /// When set, the next `create_post` behaves as if a concurrent publish
    /// won the slug race: the rival's row appears and the insert reports a
    /// uniqueness violation.
    lose_slug_race: Cell<bool>,
    category_reads: Cell<usize>,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(self, posts: Vec<Post>) -> Self {
        let max_id = posts.iter().map(|p| p.id.get()).max().unwrap_or(0);
        self.next_post_id.set(max_id);
        *self.posts.borrow_mut() = posts;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_comments(self, comments: Vec<Comment>) -> Self {
        let max_id = comments.iter().map(|c| c.id.get()).max().unwrap_or(0);
        self.next_comment_id.set(max_id);
        *self.comments.borrow_mut() = comments;
        self
    }

    pub fn losing_slug_race(self) -> Self {
        self.lose_slug_race.set(true);
        self
    }

    /// Number of times `list_categories` went to the backing store.
    pub fn category_reads(&self) -> usize {
        self.category_reads.get()
    }

    fn materialize_post(&self, post: &NewPost) -> Post {
        self.next_post_id.set(self.next_post_id.get() + 1);
        Post {
            id: PostId::new(self.next_post_id.get()).expect("test post id"),
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            cover_image_url: post.cover_image_url.clone(),
            author_id: post.author_id.clone(),
            category_id: post.category_id,
            published: post.published,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }

    fn materialize_comment(&self, comment: &NewComment) -> Comment {
        self.next_comment_id.set(self.next_comment_id.get() + 1);
        Comment {
            id: CommentId::new(self.next_comment_id.get()).expect("test comment id"),
            post_id: comment.post_id,
            author_id: comment.author_id.clone(),
            parent_id: comment.parent_id,
            body: comment.body.clone(),
            created_at: comment.created_at,
        }
    }
}

impl PostReader for TestRepository {
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)> {
        let mut items: Vec<Post> = self.posts.borrow().iter().cloned().collect();
        if query.published_only {
            items.retain(|p| p.published);
        }
        if let Some(author_id) = &query.author_id {
            items.retain(|p| &p.author_id == author_id);
        }
        if let Some(category_id) = query.category_id {
            items.retain(|p| p.category_id == Some(category_id));
        }
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len();
        if let Some(pagination) = &query.pagination {
            let offset = (pagination.page.max(1) - 1) * pagination.per_page;
            items = items
                .into_iter()
                .skip(offset)
                .take(pagination.per_page)
                .collect();
        }
        Ok((total, items))
    }

    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>> {
        Ok(self.posts.borrow().iter().find(|p| p.id == id).cloned())
    }

    fn get_post_by_slug(&self, slug: &str) -> RepositoryResult<Option<Post>> {
        Ok(self.posts.borrow().iter().find(|p| p.slug == slug).cloned())
    }

    fn slug_exists(&self, slug: &str) -> RepositoryResult<bool> {
        Ok(self.posts.borrow().iter().any(|p| p.slug == slug))
    }
}

impl PostWriter for TestRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        if self.lose_slug_race.take() {
            let rival = self.materialize_post(post);
            self.posts.borrow_mut().push(rival);
            return Err(RepositoryError::UniqueViolation(
                "UNIQUE constraint failed: posts.slug".into(),
            ));
        }
        if self.slug_exists(post.slug.as_str())? {
            return Err(RepositoryError::UniqueViolation(
                "UNIQUE constraint failed: posts.slug".into(),
            ));
        }
        let created = self.materialize_post(post);
        self.posts.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize> {
        let mut posts = self.posts.borrow_mut();
        match posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.title = update.title.clone();
                post.content = update.content.clone();
                post.excerpt = update.excerpt.clone();
                post.category_id = update.category_id;
                post.updated_at = Utc::now().naive_utc();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn set_published(&self, id: PostId, published: bool) -> RepositoryResult<usize> {
        let mut posts = self.posts.borrow_mut();
        match posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.published = published;
                post.updated_at = Utc::now().naive_utc();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        let mut posts = self.posts.borrow_mut();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        let affected = before - posts.len();
        if affected > 0 {
            self.comments.borrow_mut().retain(|c| c.post_id != id);
            self.likes.borrow_mut().retain(|(p, _)| *p != id);
            self.reading_list.borrow_mut().retain(|(p, _)| *p != id);
        }
        Ok(affected)
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.category_reads.set(self.category_reads.get() + 1);
        let mut items = self.categories.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        Ok(self.categories.iter().find(|c| c.id == id).cloned())
    }
}

impl CommentReader for TestRepository {
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>> {
        let mut items: Vec<Comment> = self
            .comments
            .borrow()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items)
    }

    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        Ok(self.comments.borrow().iter().find(|c| c.id == id).cloned())
    }
}

impl CommentWriter for TestRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        let created = self.materialize_comment(comment);
        self.comments.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        let mut comments = self.comments.borrow_mut();
        let before = comments.len();
        comments.retain(|c| c.id != id && c.parent_id != Some(id));
        Ok(before - comments.len())
    }
}

impl EngagementReader for TestRepository {
    fn count_likes(&self, post_id: PostId) -> RepositoryResult<usize> {
        Ok(self
            .likes
            .borrow()
            .iter()
            .filter(|(p, _)| *p == post_id)
            .count())
    }

    fn user_has_liked(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<bool> {
        Ok(self
            .likes
            .borrow()
            .iter()
            .any(|(p, u)| *p == post_id && u == user_id))
    }

    fn list_reading_list(
        &self,
        user_id: &UserId,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<Post>)> {
        let posts = self.posts.borrow();
        // entries were pushed in save order, so newest saved comes last
        let mut items: Vec<Post> = self
            .reading_list
            .borrow()
            .iter()
            .rev()
            .filter(|(_, u)| u == user_id)
            .filter_map(|(p, _)| posts.iter().find(|post| post.id == *p).cloned())
            .collect();
        let total = items.len();
        if let Some(pagination) = &pagination {
            let offset = (pagination.page.max(1) - 1) * pagination.per_page;
            items = items
                .into_iter()
                .skip(offset)
                .take(pagination.per_page)
                .collect();
        }
        Ok((total, items))
    }
}

impl EngagementWriter for TestRepository {
    fn like_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize> {
        let mut likes = self.likes.borrow_mut();
        if likes.iter().any(|(p, u)| *p == post_id && u == user_id) {
            return Ok(0);
        }
        likes.push((post_id, user_id.clone()));
        Ok(1)
    }

    fn unlike_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize> {
        let mut likes = self.likes.borrow_mut();
        let before = likes.len();
        likes.retain(|(p, u)| !(*p == post_id && u == user_id));
        Ok(before - likes.len())
    }

    fn save_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize> {
        let mut reading_list = self.reading_list.borrow_mut();
        if reading_list
            .iter()
            .any(|(p, u)| *p == post_id && u == user_id)
        {
            return Ok(0);
        }
        reading_list.push((post_id, user_id.clone()));
        Ok(1)
    }

    fn unsave_post(&self, post_id: PostId, user_id: &UserId) -> RepositoryResult<usize> {
        let mut reading_list = self.reading_list.borrow_mut();
        let before = reading_list.len();
        reading_list.retain(|(p, u)| !(*p == post_id && u == user_id));
        Ok(before - reading_list.len())
    }
}

impl ProfileReader for TestRepository {
    fn get_profile(&self, user_id: &UserId) -> RepositoryResult<Option<Profile>> {
        Ok(self.profiles.borrow().get(user_id).cloned())
    }
}

impl ProfileWriter for TestRepository {
    fn upsert_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> RepositoryResult<Profile> {
        let now = Utc::now().naive_utc();
        let mut profiles = self.profiles.borrow_mut();
        let profile = profiles
            .entry(user_id.clone())
            .and_modify(|p| {
                p.display_name = update.display_name.clone();
                p.bio = update.bio.clone();
                p.avatar_url = update.avatar_url.clone();
                p.updated_at = now;
            })
            .or_insert_with(|| Profile {
                user_id: user_id.clone(),
                display_name: update.display_name.clone(),
                bio: update.bio.clone(),
                avatar_url: update.avatar_url.clone(),
                created_at: now,
                updated_at: now,
            });
        Ok(profile.clone())
    }
}
