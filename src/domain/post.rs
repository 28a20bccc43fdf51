use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, ImageUrl, PostContent, PostExcerpt, PostId, PostTitle, Slug, UserId,
};

/// A published article or draft authored by a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub slug: Slug,
    pub content: PostContent,
    /// Plain-text summary; absent when nothing usable could be derived.
    pub excerpt: Option<PostExcerpt>,
    pub cover_image_url: Option<ImageUrl>,
    pub author_id: UserId,
    pub category_id: Option<CategoryId>,
    pub published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Post`], with slug, excerpt and cover URL
/// already resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPost {
    pub title: PostTitle,
    pub slug: Slug,
    pub content: PostContent,
    pub excerpt: Option<PostExcerpt>,
    pub cover_image_url: Option<ImageUrl>,
    pub author_id: UserId,
    pub category_id: Option<CategoryId>,
    pub published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Owner-editable fields of an existing [`Post`]. The slug never changes
/// after creation, so published URLs stay stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostUpdate {
    pub title: PostTitle,
    pub content: PostContent,
    pub excerpt: Option<PostExcerpt>,
    pub category_id: Option<CategoryId>,
}
