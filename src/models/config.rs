//! Tunable limits for publishing, uploads and caching.

use std::time::Duration;

/// Validation bounds applied while composing and publishing a post.
#[derive(Debug, Clone)]
pub struct PublishLimits {
    /// Truncation point for excerpts derived from content.
    pub excerpt_max_chars: usize,
    /// Longest slug ever produced, collision suffix included.
    pub slug_max_chars: usize,
    /// Collision suffixes tried before slug resolution gives up.
    pub slug_max_attempts: usize,
}

impl Default for PublishLimits {
    fn default() -> Self {
        Self {
            excerpt_max_chars: 500,
            slug_max_chars: 100,
            slug_max_attempts: 10_000,
        }
    }
}

/// Acceptance and recompression bounds for image uploads.
#[derive(Debug, Clone)]
pub struct ImageLimits {
    /// Hard ceiling on accepted file size, in bytes.
    pub max_bytes: usize,
    /// Files at or below this size are stored as received.
    pub compress_threshold_bytes: usize,
    /// Longest edge after resizing, in pixels. Images are never scaled up.
    pub max_dimension: u32,
    /// JPEG quality used when re-encoding.
    pub jpeg_quality: u8,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            compress_threshold_bytes: 1024 * 1024,
            max_dimension: 1920,
            jpeg_quality: 80,
        }
    }
}

/// Settings for the upload service.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub image: ImageLimits,
    /// Newest objects kept per user and purpose when cleanup runs.
    pub keep_per_purpose: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            image: ImageLimits::default(),
            keep_per_purpose: 3,
        }
    }
}

/// Everything the post publisher needs to know.
#[derive(Debug, Clone, Default)]
pub struct PublishConfig {
    pub limits: PublishLimits,
    pub upload: UploadConfig,
}

/// Sizing and expiry of the query cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry stays servable after being stored.
    pub ttl: Duration,
    /// Entry count at which the oldest insertion is evicted.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            capacity: 64,
        }
    }
}
