use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::comment::NewComment;
use crate::domain::types::{CommentBody, CommentId, PostId, TypeConstraintError, UserId};

/// Raw comment submission.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentForm {
    #[validate(range(min = 1))]
    pub post_id: i32,
    /// Present when replying to a top-level comment.
    #[validate(range(min = 1))]
    pub parent_id: Option<i32>,
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

/// Validated comment submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AddCommentFormPayload {
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    pub body: CommentBody,
}

impl AddCommentFormPayload {
    pub fn into_new_comment(self, author_id: UserId) -> NewComment {
        NewComment {
            post_id: self.post_id,
            author_id,
            parent_id: self.parent_id,
            body: self.body,
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AddCommentFormError {
    #[error("Add comment form validation failed: {0}")]
    Validation(String),
    #[error("Add comment form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddCommentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddCommentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddCommentForm> for AddCommentFormPayload {
    type Error = AddCommentFormError;

    fn try_from(value: AddCommentForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            post_id: PostId::new(value.post_id)?,
            parent_id: value.parent_id.map(CommentId::new).transpose()?,
            body: CommentBody::new(value.body)?,
        })
    }
}
