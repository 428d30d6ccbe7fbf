//! URL-safe product slugs.

use regex::Regex;
use std::sync::LazyLock;

/// Lowercase ASCII alphanumeric runs joined by single hyphens.
static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

pub const MAX_SLUG_LEN: usize = 255;

/// Room left for a `-N` suffix when deriving from long names.
const MAX_BASE_LEN: usize = 240;

/// Used when a product name has no ASCII alphanumerics at all.
pub const FALLBACK_SLUG: &str = "product";

pub fn is_valid(slug: &str) -> bool {
    slug.len() <= MAX_SLUG_LEN && SLUG_PATTERN.is_match(slug)
}

pub fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    if !is_valid(slug) {
        return Err(validator::ValidationError::new("invalid_slug").with_message(
            "Slug must be lowercase letters and digits separated by single hyphens".into(),
        ));
    }
    Ok(())
}

/// Derives a slug from a product name. Anything that isn't an ASCII letter
/// or digit becomes a separator.
///
/// ```
/// use domain_catalog::slug::slugify;
///
/// assert_eq!(slugify("  Oak Chair (2024) "), "oak-chair-2024");
/// assert_eq!(slugify("***"), "product");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for word in name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if slug.len() + word.len() + 1 > MAX_BASE_LEN {
            // A single oversized word is cut rather than dropped.
            if slug.is_empty() {
                slug.push_str(&word[..MAX_BASE_LEN].to_ascii_lowercase());
            }
            break;
        }
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&word.to_ascii_lowercase());
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// The `attempt`-th candidate for `base`: `base`, `base-2`, `base-3`, ...
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("Chair"), "chair");
        assert_eq!(slugify("Red -- Velvet   Sofa"), "red-velvet-sofa");
        assert_eq!(slugify("Café Table"), "caf-table");
    }

    #[test]
    fn test_slugify_output_is_valid() {
        for name in ["Chair", "  x  ", "A/B/C", "100% Cotton", "!!"] {
            assert!(is_valid(&slugify(name)), "{name}");
        }
    }

    #[test]
    fn test_slugify_limits_length() {
        let name = "word ".repeat(200);
        let slug = slugify(&name);
        assert!(slug.len() <= MAX_BASE_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_slugify_truncates_long_first_word() {
        let name = format!("{} Chair", "A".repeat(300));
        let slug = slugify(&name);
        assert_eq!(slug, "a".repeat(MAX_BASE_LEN));
        assert!(is_valid(&slug));
    }

    #[test]
    fn test_pattern() {
        assert!(is_valid("oak-chair-2"));
        assert!(!is_valid("Oak-chair"));
        assert!(!is_valid("oak--chair"));
        assert!(!is_valid("-oak"));
        assert!(!is_valid("oak_chair"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_candidates() {
        assert_eq!(candidate("chair", 1), "chair");
        assert_eq!(candidate("chair", 2), "chair-2");
        assert_eq!(candidate("chair", 10), "chair-10");
    }
}
