//! Post listing, publishing and editing.
//!
//! Reads that back the public pages go through the query cache; every write
//! clears it wholesale, trading hit rate for the guarantee that no page ever
//! serves a stale post.

use crate::cache::{CachedValue, QueryCache, cache_key};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::types::{PostExcerpt, PostId, Slug, UploadPurpose, UserId};
use crate::excerpt::extract_excerpt;
use crate::forms::posts::{PublishPostFormPayload, UpdatePostFormPayload};
use crate::models::config::{PublishConfig, PublishLimits};
use crate::repository::errors::RepositoryError;
use crate::repository::{PostListQuery, PostReader, PostWriter};
use crate::slug::{slugify, truncate_slug};
use crate::storage::ObjectStorage;

use super::uploads;
use super::{ServiceError, ServiceResult};

/// Lists posts matching `query`, memoizing each distinct page.
pub fn list_posts<R: PostReader>(
    query: PostListQuery,
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<(usize, Vec<Post>)> {
    let key = cache_key("posts", &query);
    if let Some(CachedValue::PostPage { total, posts }) = cache.get(&key) {
        return Ok((total, posts));
    }

    match repo.list_posts(query) {
        Ok((total, posts)) => {
            cache.set(
                key,
                CachedValue::PostPage {
                    total,
                    posts: posts.clone(),
                },
            );
            Ok((total, posts))
        }
        Err(e) => {
            log::error!("Failed to list posts: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetches a single post by its slug, memoizing hits.
pub fn get_post_by_slug<R: PostReader>(
    slug: &str,
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<Post> {
    let key = cache_key("post_by_slug", &slug);
    if let Some(CachedValue::Post(post)) = cache.get(&key) {
        return Ok(post);
    }

    match repo.get_post_by_slug(slug) {
        Ok(Some(post)) => {
            cache.set(key, CachedValue::Post(post.clone()));
            Ok(post)
        }
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post by slug: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Runs the whole publishing pipeline for a validated submission.
///
/// The cover image is uploaded first so a rejected or failed upload aborts
/// before anything reaches the database. Then the slug is derived from the
/// title and resolved against existing posts, the excerpt is taken from the
/// author or derived from content, the post is inserted and the query cache
/// is cleared. Losing the slug to a concurrent publish between resolution
/// and insert is retried once with a freshly resolved slug.
///
/// An insert that still fails leaves the already stored cover behind as an
/// orphan; the retention sweep bounds how many such objects accumulate.
pub fn publish_post<R, S>(
    mut payload: PublishPostFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    storage: &S,
    cache: &QueryCache,
    config: &PublishConfig,
) -> ServiceResult<Post>
where
    R: PostReader + PostWriter,
    S: ObjectStorage + Clone + Send + 'static,
{
    let author = UserId::new(user.id.clone()).map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;

    let cover_image_url = match payload.cover_image.take() {
        Some(file) => {
            let uploaded = uploads::upload_image(
                file,
                user,
                UploadPurpose::Cover,
                storage,
                &config.upload,
                |_| {},
            )?;
            Some(uploaded.url)
        }
        None => None,
    };

    let candidate = slugify(payload.title.as_str(), config.limits.slug_max_chars);
    let slug = resolve_unique_slug(&candidate, repo, &config.limits)?;

    let excerpt = match payload.excerpt.take() {
        Some(excerpt) => Some(excerpt),
        None => derive_excerpt(payload.content.as_str(), &config.limits)?,
    };

    let new_post = payload.into_new_post(slug, excerpt, cover_image_url, author);

    let created = match repo.create_post(&new_post) {
        Ok(post) => post,
        Err(RepositoryError::UniqueViolation(_)) => {
            // Lost the slug to a concurrent publish; resolve again once.
            let slug = resolve_unique_slug(&candidate, repo, &config.limits)?;
            let retry = NewPost { slug, ..new_post };
            match repo.create_post(&retry) {
                Ok(post) => post,
                Err(e) => {
                    log::error!("Failed to create post after slug retry: {e}");
                    return Err(ServiceError::PublishFailed(e.to_string()));
                }
            }
        }
        Err(e) => {
            log::error!("Failed to create post: {e}");
            return Err(ServiceError::PublishFailed(e.to_string()));
        }
    };

    cache.clear();
    Ok(created)
}

/// Finds a free slug, starting from `candidate` and appending `-1`, `-2`,
/// and so on until one is unclaimed.
///
/// The suffix counts against the slug length bound, so long candidates are
/// truncated to make room for it. Gives up with
/// [`ServiceError::PublishFailed`] once `limits.slug_max_attempts` suffixes
/// are all taken.
pub fn resolve_unique_slug<R: PostReader>(
    candidate: &str,
    repo: &R,
    limits: &PublishLimits,
) -> ServiceResult<Slug> {
    let taken = match repo.slug_exists(candidate) {
        Ok(taken) => taken,
        Err(e) => {
            log::error!("Failed to check slug {candidate}: {e}");
            return Err(ServiceError::Internal);
        }
    };
    if !taken {
        return finish_slug(candidate);
    }

    for n in 1..=limits.slug_max_attempts {
        let suffix = format!("-{n}");
        let base = truncate_slug(
            candidate,
            limits.slug_max_chars.saturating_sub(suffix.len()),
        );
        let attempt = format!("{base}{suffix}");
        match repo.slug_exists(&attempt) {
            Ok(true) => continue,
            Ok(false) => return finish_slug(&attempt),
            Err(e) => {
                log::error!("Failed to check slug {attempt}: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }

    Err(ServiceError::PublishFailed(format!(
        "no free slug for {candidate} within {} attempts",
        limits.slug_max_attempts
    )))
}

fn finish_slug(value: &str) -> ServiceResult<Slug> {
    Slug::new(value).map_err(|e| ServiceError::Validation(e.to_string()))
}

/// Derives the stored excerpt from content when the author left it blank.
/// Content that strips down to nothing gets no excerpt at all.
fn derive_excerpt(content: &str, limits: &PublishLimits) -> ServiceResult<Option<PostExcerpt>> {
    let derived = extract_excerpt(content, limits.excerpt_max_chars);
    if derived.is_empty() {
        return Ok(None);
    }
    let excerpt = PostExcerpt::new(derived).map_err(|e| {
        log::error!("Derived excerpt violates its own bounds: {e}");
        ServiceError::Internal
    })?;
    Ok(Some(excerpt))
}

/// Applies an owner's edits to their post.
///
/// The slug is never changed, so published URLs stay stable no matter how
/// often the title is reworded. Returns `Ok(true)` on success and `Ok(false)`
/// when the repository rejected the update.
pub fn update_post<R>(
    mut payload: UpdatePostFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    cache: &QueryCache,
    limits: &PublishLimits,
) -> ServiceResult<bool>
where
    R: PostReader + PostWriter,
{
    let post = match repo.get_post_by_id(payload.post_id) {
        Ok(Some(post)) => post,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if post.author_id.as_str() != user.id {
        return Err(ServiceError::Unauthorized);
    }

    let excerpt = match payload.excerpt.take() {
        Some(excerpt) => Some(excerpt),
        None => derive_excerpt(payload.content.as_str(), limits)?,
    };

    let update = PostUpdate {
        title: payload.title,
        content: payload.content,
        excerpt,
        category_id: payload.category_id,
    };

    match repo.update_post(post.id, &update) {
        Ok(_) => {
            cache.clear();
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to update post: {e}");
            Ok(false)
        }
    }
}

/// Publishes or unpublishes an existing post the user owns.
pub fn set_published<R>(
    post_id: i32,
    published: bool,
    user: &AuthenticatedUser,
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<bool>
where
    R: PostReader + PostWriter,
{
    let post = owned_post(post_id, user, repo)?;

    match repo.set_published(post.id, published) {
        Ok(_) => {
            cache.clear();
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to set published flag: {e}");
            Ok(false)
        }
    }
}

/// Deletes a post the user owns. Comments, likes and reading-list entries
/// for it go with it.
pub fn delete_post<R>(
    post_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<bool>
where
    R: PostReader + PostWriter,
{
    let post = owned_post(post_id, user, repo)?;

    match repo.delete_post(post.id) {
        Ok(_) => {
            cache.clear();
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to delete post: {e}");
            Ok(false)
        }
    }
}

/// Fetches a post and checks that `user` owns it.
fn owned_post<R: PostReader>(
    post_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Post> {
    let post_id = PostId::new(post_id).map_err(|_| ServiceError::NotFound)?;

    let post = match repo.get_post_by_id(post_id) {
        Ok(Some(post)) => post,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if post.author_id.as_str() != user.id {
        return Err(ServiceError::Unauthorized);
    }

    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::DateTime;

    use crate::domain::types::{PostContent, PostTitle};
    use crate::imaging::UploadFile;
    use crate::models::config::CacheConfig;
    use crate::repository::test::TestRepository;
    use crate::storage::test::TestStorage;

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: "user-1".into(),
            email: "test@example.com".into(),
            name: "Test".into(),
        }
    }

    fn sample_post(id: i32, slug: &str) -> Post {
        Post {
            id: PostId::new(id).unwrap(),
            title: PostTitle::new("Sample").unwrap(),
            slug: Slug::new(slug).unwrap(),
            content: PostContent::new("Body text").unwrap(),
            excerpt: None,
            cover_image_url: None,
            author_id: UserId::new("user-1").unwrap(),
            category_id: None,
            published: true,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn sample_payload(title: &str) -> PublishPostFormPayload {
        PublishPostFormPayload {
            title: PostTitle::new(title).unwrap(),
            content: PostContent::new("Some **bold** content for the post body.").unwrap(),
            excerpt: None,
            category_id: None,
            published: true,
            cover_image: None,
        }
    }

    fn test_cache() -> QueryCache {
        QueryCache::new(CacheConfig::default())
    }

    #[test]
    fn publish_derives_slug_and_excerpt() {
        let repo = TestRepository::new();
        let storage = TestStorage::new();
        let cache = test_cache();

        let post = publish_post(
            sample_payload("My First Post!"),
            &sample_user(),
            &repo,
            &storage,
            &cache,
            &PublishConfig::default(),
        )
        .unwrap();

        assert_eq!(post.slug, "my-first-post");
        assert_eq!(
            post.excerpt.as_deref(),
            Some("Some bold content for the post body.")
        );
        assert!(post.published);
    }

    #[test]
    fn publish_respects_author_excerpt() {
        let repo = TestRepository::new();
        let storage = TestStorage::new();
        let cache = test_cache();

        let mut payload = sample_payload("Titled");
        payload.excerpt = Some(PostExcerpt::new("Hand written.").unwrap());

        let post = publish_post(
            payload,
            &sample_user(),
            &repo,
            &storage,
            &cache,
            &PublishConfig::default(),
        )
        .unwrap();

        assert_eq!(post.excerpt.as_deref(), Some("Hand written."));
    }

    #[test]
    fn publish_appends_suffix_when_slug_taken() {
        let repo = TestRepository::new().with_posts(vec![sample_post(1, "my-first-post")]);
        let storage = TestStorage::new();
        let cache = test_cache();

        let post = publish_post(
            sample_payload("My First Post"),
            &sample_user(),
            &repo,
            &storage,
            &cache,
            &PublishConfig::default(),
        )
        .unwrap();

        assert_eq!(post.slug, "my-first-post-1");
    }

    #[test]
    fn publish_retries_once_after_losing_slug_race() {
        let repo = TestRepository::new().losing_slug_race();
        let storage = TestStorage::new();
        let cache = test_cache();

        let post = publish_post(
            sample_payload("My Post"),
            &sample_user(),
            &repo,
            &storage,
            &cache,
            &PublishConfig::default(),
        )
        .unwrap();

        assert_eq!(post.slug, "my-post-1");
    }

    #[test]
    fn publish_uploads_cover_image_first() {
        let repo = TestRepository::new();
        let storage = TestStorage::new();
        let cache = test_cache();

        let payload = sample_payload("With Cover")
            .with_cover_image(UploadFile::new("c.jpg", "image/jpeg", vec![0; 64]));

        let post = publish_post(
            payload,
            &sample_user(),
            &repo,
            &storage,
            &cache,
            &PublishConfig::default(),
        )
        .unwrap();

        let url = post.cover_image_url.expect("cover url");
        assert!(url.as_str().starts_with("https://cdn.test/user-1/cover/"));
        assert_eq!(storage.keys().len(), 1);
    }

    #[test]
    fn invalid_cover_aborts_publish_before_insert() {
        let repo = TestRepository::new();
        let storage = TestStorage::new();
        let cache = test_cache();

        let payload = sample_payload("Broken Cover")
            .with_cover_image(UploadFile::new("anim.gif", "image/gif", vec![0; 64]));

        let result = publish_post(
            payload,
            &sample_user(),
            &repo,
            &storage,
            &cache,
            &PublishConfig::default(),
        );

        assert!(matches!(result, Err(ServiceError::InvalidFile(_))));
        assert_eq!(storage.put_count(), 0);
        let (total, _) = repo.list_posts(PostListQuery::default()).unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn publish_clears_cached_listings() {
        let repo = TestRepository::new().with_posts(vec![sample_post(1, "existing")]);
        let storage = TestStorage::new();
        let cache = test_cache();

        let (total, _) = list_posts(PostListQuery::default(), &repo, &cache).unwrap();
        assert_eq!(total, 1);

        publish_post(
            sample_payload("Another"),
            &sample_user(),
            &repo,
            &storage,
            &cache,
            &PublishConfig::default(),
        )
        .unwrap();

        let (total, _) = list_posts(PostListQuery::default(), &repo, &cache).unwrap();
        assert_eq!(total, 2);
    }

    #[test]
    fn list_posts_serves_memoized_page_until_cleared() {
        let repo = TestRepository::new();
        let cache = test_cache();

        let (total, _) = list_posts(PostListQuery::default(), &repo, &cache).unwrap();
        assert_eq!(total, 0);

        // Insert behind the service's back so no invalidation runs.
        let rogue = sample_payload("Rogue").into_new_post(
            Slug::new("rogue").unwrap(),
            None,
            None,
            UserId::new("user-1").unwrap(),
        );
        repo.create_post(&rogue).unwrap();

        let (total, _) = list_posts(PostListQuery::default(), &repo, &cache).unwrap();
        assert_eq!(total, 0);

        cache.clear();
        let (total, _) = list_posts(PostListQuery::default(), &repo, &cache).unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn get_post_by_slug_memoizes_hits() {
        let repo = TestRepository::new().with_posts(vec![sample_post(1, "hello")]);
        let cache = test_cache();

        let post = get_post_by_slug("hello", &repo, &cache).unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(cache.len(), 1);

        assert!(matches!(
            get_post_by_slug("missing", &repo, &cache),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn resolve_unique_slug_skips_taken_suffixes() {
        let repo = TestRepository::new()
            .with_posts(vec![sample_post(1, "my-post"), sample_post(2, "my-post-1")]);

        let slug = resolve_unique_slug("my-post", &repo, &PublishLimits::default()).unwrap();

        assert_eq!(slug, "my-post-2");
    }

    #[test]
    fn resolve_unique_slug_truncates_to_fit_suffix() {
        let limits = PublishLimits {
            slug_max_chars: 8,
            ..PublishLimits::default()
        };
        let repo = TestRepository::new().with_posts(vec![sample_post(1, "abcdefgh")]);

        let slug = resolve_unique_slug("abcdefgh", &repo, &limits).unwrap();

        assert_eq!(slug, "abcdef-1");
    }

    #[test]
    fn resolve_unique_slug_gives_up_after_attempt_cap() {
        let limits = PublishLimits {
            slug_max_attempts: 2,
            ..PublishLimits::default()
        };
        let repo = TestRepository::new().with_posts(vec![
            sample_post(1, "busy"),
            sample_post(2, "busy-1"),
            sample_post(3, "busy-2"),
        ]);

        assert!(matches!(
            resolve_unique_slug("busy", &repo, &limits),
            Err(ServiceError::PublishFailed(_))
        ));
    }

    #[test]
    fn update_post_keeps_slug_and_derives_excerpt() {
        let repo = TestRepository::new().with_posts(vec![sample_post(1, "stable-slug")]);
        let cache = test_cache();

        let payload = UpdatePostFormPayload {
            post_id: PostId::new(1).unwrap(),
            title: PostTitle::new("Renamed Entirely").unwrap(),
            content: PostContent::new("New body").unwrap(),
            excerpt: None,
            category_id: None,
        };

        assert!(
            update_post(
                payload,
                &sample_user(),
                &repo,
                &cache,
                &PublishLimits::default()
            )
            .unwrap()
        );

        let post = repo.get_post_by_id(PostId::new(1).unwrap()).unwrap().unwrap();
        assert_eq!(post.slug, "stable-slug");
        assert_eq!(post.title, "Renamed Entirely");
        assert_eq!(post.excerpt.as_deref(), Some("New body"));
    }

    #[test]
    fn update_post_requires_ownership() {
        let repo = TestRepository::new().with_posts(vec![sample_post(1, "stable-slug")]);
        let cache = test_cache();
        let stranger = AuthenticatedUser {
            id: "user-2".into(),
            email: "other@example.com".into(),
            name: "Other".into(),
        };

        let payload = UpdatePostFormPayload {
            post_id: PostId::new(1).unwrap(),
            title: PostTitle::new("Hijacked").unwrap(),
            content: PostContent::new("nope").unwrap(),
            excerpt: None,
            category_id: None,
        };

        assert!(matches!(
            update_post(payload, &stranger, &repo, &cache, &PublishLimits::default()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn delete_post_requires_ownership() {
        let repo = TestRepository::new().with_posts(vec![sample_post(1, "mine")]);
        let cache = test_cache();
        let stranger = AuthenticatedUser {
            id: "user-2".into(),
            email: "other@example.com".into(),
            name: "Other".into(),
        };

        assert!(matches!(
            delete_post(1, &stranger, &repo, &cache),
            Err(ServiceError::Unauthorized)
        ));
        assert!(delete_post(1, &sample_user(), &repo, &cache).unwrap());
        assert!(matches!(
            delete_post(1, &sample_user(), &repo, &cache),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn set_published_clears_cached_pages() {
        let repo = TestRepository::new().with_posts(vec![sample_post(1, "mine")]);
        let cache = test_cache();

        let query = PostListQuery::default().published();
        let (total, _) = list_posts(query.clone(), &repo, &cache).unwrap();
        assert_eq!(total, 1);

        assert!(set_published(1, false, &sample_user(), &repo, &cache).unwrap());

        let (total, _) = list_posts(query, &repo, &cache).unwrap();
        assert_eq!(total, 0);
    }
}
