//! URL-safe slug derivation from post titles.

/// Slug used when a title contains no usable characters at all.
pub const FALLBACK_SLUG: &str = "untitled-post";

/// Derive a URL-safe slug from a title.
///
/// Lower-cases the title, keeps ASCII letters, digits and hyphens, turns
/// whitespace runs into single hyphens and drops everything else. Hyphen
/// runs collapse, edges are never hyphens, and the result is cut to
/// `max_chars`. Titles with nothing usable yield [`FALLBACK_SLUG`].
/// Running the function over its own output changes nothing.
pub fn slugify(title: &str, max_chars: usize) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.to_lowercase().chars() {
        match ch {
            'a'..='z' | '0'..='9' => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(ch);
            }
            '-' => pending_hyphen = true,
            c if c.is_whitespace() => pending_hyphen = true,
            _ => {}
        }
    }

    if slug.is_empty() {
        slug = FALLBACK_SLUG.to_string();
    }

    truncate_slug(&slug, max_chars)
}

/// Cut a slug to at most `max_chars` characters, dropping any hyphen the cut
/// exposes at the end. Used on derived slugs and on collision-suffix bases.
pub fn truncate_slug(slug: &str, max_chars: usize) -> String {
    let cut: String = slug.chars().take(max_chars).collect();
    cut.trim_end_matches('-').to_string()
}
