use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::post::NewPost;
use crate::domain::types::{
    CategoryId, ImageUrl, PostContent, PostExcerpt, PostId, PostTitle, Slug, TypeConstraintError,
    UserId,
};
use crate::imaging::UploadFile;

/// Raw publish request as submitted by the author.
#[derive(Debug, Deserialize, Validate)]
pub struct PublishPostForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    /// Author-supplied summary; left empty to have one derived from content.
    #[validate(length(max = 500))]
    pub excerpt: Option<String>,
    #[validate(range(min = 1))]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub published: bool,
}

/// Validated publish request.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishPostFormPayload {
    pub title: PostTitle,
    pub content: PostContent,
    pub excerpt: Option<PostExcerpt>,
    pub category_id: Option<CategoryId>,
    pub published: bool,
    /// Cover image, which arrives separately from the form fields.
    pub cover_image: Option<UploadFile>,
}

impl PublishPostFormPayload {
    pub fn with_cover_image(mut self, file: UploadFile) -> Self {
        self.cover_image = Some(file);
        self
    }

    /// Build the insertable post once slug, excerpt and cover URL are
    /// resolved.
    pub fn into_new_post(
        self,
        slug: Slug,
        excerpt: Option<PostExcerpt>,
        cover_image_url: Option<ImageUrl>,
        author_id: UserId,
    ) -> NewPost {
        let now = Utc::now().naive_utc();
        NewPost {
            title: self.title,
            slug,
            content: self.content,
            excerpt,
            cover_image_url,
            author_id,
            category_id: self.category_id,
            published: self.published,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishPostFormError {
    #[error("Publish post form validation failed: {0}")]
    Validation(String),
    #[error("Publish post form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for PublishPostFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for PublishPostFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<PublishPostForm> for PublishPostFormPayload {
    type Error = PublishPostFormError;

    fn try_from(value: PublishPostForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            title: PostTitle::new(value.title)?,
            content: PostContent::new(value.content)?,
            excerpt: value
                .excerpt
                .filter(|e| !e.trim().is_empty())
                .map(PostExcerpt::new)
                .transpose()?,
            category_id: value.category_id.map(CategoryId::new).transpose()?,
            published: value.published,
            cover_image: None,
        })
    }
}

/// Raw edit request for an existing post. Slugs are not editable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostForm {
    #[validate(range(min = 1))]
    pub post_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(length(max = 500))]
    pub excerpt: Option<String>,
    #[validate(range(min = 1))]
    pub category_id: Option<i32>,
}

/// Validated edit request.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePostFormPayload {
    pub post_id: PostId,
    pub title: PostTitle,
    pub content: PostContent,
    pub excerpt: Option<PostExcerpt>,
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Error)]
pub enum UpdatePostFormError {
    #[error("Update post form validation failed: {0}")]
    Validation(String),
    #[error("Update post form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdatePostFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdatePostFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdatePostForm> for UpdatePostFormPayload {
    type Error = UpdatePostFormError;

    fn try_from(value: UpdatePostForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            post_id: PostId::new(value.post_id)?,
            title: PostTitle::new(value.title)?,
            content: PostContent::new(value.content)?,
            excerpt: value
                .excerpt
                .filter(|e| !e.trim().is_empty())
                .map(PostExcerpt::new)
                .transpose()?,
            category_id: value.category_id.map(CategoryId::new).transpose()?,
        })
    }
}
