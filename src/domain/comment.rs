use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CommentBody, CommentId, PostId, UserId};

/// Reader feedback attached to a post.
///
/// Replies nest exactly one level: a reply's parent is always a top-level
/// comment on the same post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub parent_id: Option<CommentId>,
    pub body: CommentBody,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Comment`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: UserId,
    pub parent_id: Option<CommentId>,
    pub body: CommentBody,
    pub created_at: NaiveDateTime,
}
