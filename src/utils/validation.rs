//! Input validation utilities

/// Maximum length accepted for organization slugs
pub const MAX_SLUG_LENGTH: usize = 100;

/// Validate an organization slug
///
/// Slugs are lowercase alphanumeric runs joined by single hyphens,
/// never starting or ending with a hyphen.
pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.chars().count() > MAX_SLUG_LENGTH {
        return false;
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return false;
    }
    slug.chars()
        .all(|c| c == '-' || c.is_numeric() || (c.is_alphabetic() && c.is_lowercase()))
}

/// Generate a URL-safe slug from a display name
///
/// Punctuation is dropped, whitespace and separator characters collapse
/// into single hyphens.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
