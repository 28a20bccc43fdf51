use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::post::{NewPost as DomainNewPost, Post as DomainPost};
use crate::domain::types::{
    CategoryId, ImageUrl, PostContent, PostExcerpt, PostTitle, Slug, TypeConstraintError, UserId,
};

/// Diesel model representing the `posts` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::posts)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image_url: Option<String>,
    pub author_id: String,
    pub category_id: Option<i32>,
    pub published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Post`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image_url: Option<String>,
    pub author_id: String,
    pub category_id: Option<i32>,
    pub published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Post> for DomainPost {
    type Error = TypeConstraintError;

    fn try_from(post: Post) -> Result<Self, Self::Error> {
        Ok(Self {
            id: post.id.try_into()?,
            title: PostTitle::new(post.title)?,
            slug: Slug::new(post.slug)?,
            content: PostContent::new(post.content)?,
            excerpt: post.excerpt.map(PostExcerpt::new).transpose()?,
            cover_image_url: post.cover_image_url.map(ImageUrl::new).transpose()?,
            author_id: UserId::new(post.author_id)?,
            category_id: post.category_id.map(CategoryId::new).transpose()?,
            published: post.published,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }
}

impl From<DomainNewPost> for NewPost {
    fn from(post: DomainNewPost) -> Self {
        Self {
            title: post.title.into_inner(),
            slug: post.slug.into_inner(),
            content: post.content.into_inner(),
            excerpt: post.excerpt.map(PostExcerpt::into_inner),
            cover_image_url: post.cover_image_url.map(ImageUrl::into_inner),
            author_id: post.author_id.into_inner(),
            category_id: post.category_id.map(CategoryId::get),
            published: post.published,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
