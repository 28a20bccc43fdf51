//! Comment threads under posts. Replies nest exactly one level.

use crate::cache::QueryCache;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::comment::Comment;
use crate::domain::types::{CommentId, PostId, UserId};
use crate::forms::comments::AddCommentFormPayload;
use crate::repository::{CommentReader, CommentWriter, PostReader};

use super::{ServiceError, ServiceResult};

/// Lists a post's comments, oldest first.
pub fn list_comments<R: CommentReader>(post_id: i32, repo: &R) -> ServiceResult<Vec<Comment>> {
    let post_id = PostId::new(post_id).map_err(|_| ServiceError::NotFound)?;

    match repo.list_comments(post_id) {
        Ok(comments) => Ok(comments),
        Err(e) => {
            log::error!("Failed to list comments: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Attaches a comment, or a reply to a top-level comment, to a post.
pub fn add_comment<R>(
    payload: AddCommentFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<Comment>
where
    R: PostReader + CommentReader + CommentWriter,
{
    let author = UserId::new(user.id.clone()).map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;

    match repo.get_post_by_id(payload.post_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            return Err(ServiceError::Internal);
        }
    }

    if let Some(parent_id) = payload.parent_id {
        let parent = match repo.get_comment_by_id(parent_id) {
            Ok(Some(parent)) => parent,
            Ok(None) => return Err(ServiceError::NotFound),
            Err(e) => {
                log::error!("Failed to get parent comment: {e}");
                return Err(ServiceError::Internal);
            }
        };
        if parent.post_id != payload.post_id {
            return Err(ServiceError::Validation(
                "parent comment belongs to a different post".into(),
            ));
        }
        if parent.parent_id.is_some() {
            return Err(ServiceError::Validation(
                "replies cannot be nested more than one level".into(),
            ));
        }
    }

    let comment = payload.into_new_comment(author);
    match repo.create_comment(&comment) {
        Ok(created) => {
            cache.clear();
            Ok(created)
        }
        Err(e) => {
            log::error!("Failed to create comment: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Deletes a comment the user wrote. Replies to it go with it.
pub fn delete_comment<R>(
    comment_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<bool>
where
    R: CommentReader + CommentWriter,
{
    let comment_id = CommentId::new(comment_id).map_err(|_| ServiceError::NotFound)?;

    let comment = match repo.get_comment_by_id(comment_id) {
        Ok(Some(comment)) => comment,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get comment: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if comment.author_id.as_str() != user.id {
        return Err(ServiceError::Unauthorized);
    }

    match repo.delete_comment(comment.id) {
        Ok(_) => {
            cache.clear();
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to delete comment: {e}");
            Ok(false)
        }
    }
}
