//! Likes and reading lists.
//!
//! Both are idempotent: liking or saving twice is absorbed by the composite
//! primary key and changes nothing.

use crate::cache::QueryCache;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::post::Post;
use crate::domain::types::{PostId, UserId};
use crate::pagination::Pagination;
use crate::repository::{EngagementReader, EngagementWriter, PostReader};

use super::{ServiceError, ServiceResult};

/// Records that `user` likes a post.
pub fn like_post<R>(
    post_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<bool>
where
    R: PostReader + EngagementWriter,
{
    let (post_id, author) = existing_post_and_user(post_id, user, repo)?;

    match repo.like_post(post_id, &author) {
        Ok(_) => {
            cache.clear();
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to like post: {e}");
            Ok(false)
        }
    }
}

/// Removes the user's like. Unliking a post never liked changes nothing.
pub fn unlike_post<R>(
    post_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<bool>
where
    R: EngagementWriter,
{
    let (post_id, author) = ids_for(post_id, user)?;

    match repo.unlike_post(post_id, &author) {
        Ok(_) => {
            cache.clear();
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to unlike post: {e}");
            Ok(false)
        }
    }
}

/// Adds a post to the user's reading list.
pub fn save_post<R>(
    post_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<bool>
where
    R: PostReader + EngagementWriter,
{
    let (post_id, author) = existing_post_and_user(post_id, user, repo)?;

    match repo.save_post(post_id, &author) {
        Ok(_) => {
            cache.clear();
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to save post: {e}");
            Ok(false)
        }
    }
}

/// Drops a post from the user's reading list.
pub fn unsave_post<R>(
    post_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<bool>
where
    R: EngagementWriter,
{
    let (post_id, author) = ids_for(post_id, user)?;

    match repo.unsave_post(post_id, &author) {
        Ok(_) => {
            cache.clear();
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to unsave post: {e}");
            Ok(false)
        }
    }
}

/// Like count for a post plus whether `user` is among the likers.
pub fn like_summary<R: EngagementReader>(
    post_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<(usize, bool)> {
    let (post_id, author) = ids_for(post_id, user)?;

    let count = match repo.count_likes(post_id) {
        Ok(count) => count,
        Err(e) => {
            log::error!("Failed to count likes: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.user_has_liked(post_id, &author) {
        Ok(liked) => Ok((count, liked)),
        Err(e) => {
            log::error!("Failed to check like: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// The user's own reading list, most recently saved first.
pub fn list_reading_list<R: EngagementReader>(
    pagination: Option<Pagination>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<(usize, Vec<Post>)> {
    let author = UserId::new(user.id.clone()).map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;

    match repo.list_reading_list(&author, pagination) {
        Ok(page) => Ok(page),
        Err(e) => {
            log::error!("Failed to list reading list: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn ids_for(post_id: i32, user: &AuthenticatedUser) -> ServiceResult<(PostId, UserId)> {
    let post_id = PostId::new(post_id).map_err(|_| ServiceError::NotFound)?;
    let author = UserId::new(user.id.clone()).map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;
    Ok((post_id, author))
}

fn existing_post_and_user<R: PostReader>(
    post_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<(PostId, UserId)> {
    let (post_id, author) = ids_for(post_id, user)?;

    match repo.get_post_by_id(post_id) {
        Ok(Some(_)) => Ok((post_id, author)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            Err(ServiceError::Internal)
        }
    }
}
