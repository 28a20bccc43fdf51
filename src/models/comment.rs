use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::comment::{Comment as DomainComment, NewComment as DomainNewComment};
use crate::domain::types::{CommentBody, CommentId, TypeConstraintError, UserId};

/// Diesel model representing the `comments` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::comments)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author_id: String,
    pub parent_id: Option<i32>,
    pub body: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Comment`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub post_id: i32,
    pub author_id: String,
    pub parent_id: Option<i32>,
    pub body: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Comment> for DomainComment {
    type Error = TypeConstraintError;

    fn try_from(comment: Comment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: comment.id.try_into()?,
            post_id: comment.post_id.try_into()?,
            author_id: UserId::new(comment.author_id)?,
            parent_id: comment.parent_id.map(CommentId::new).transpose()?,
            body: CommentBody::new(comment.body)?,
            created_at: comment.created_at,
        })
    }
}

impl From<DomainNewComment> for NewComment {
    fn from(comment: DomainNewComment) -> Self {
        Self {
            post_id: comment.post_id.get(),
            author_id: comment.author_id.into_inner(),
            parent_id: comment.parent_id.map(CommentId::get),
            body: comment.body.into_inner(),
            created_at: comment.created_at,
        }
    }
}
