/// Longest slug produced by [`slugify`], without the uniqueness suffix.
pub const MAX_SLUG_LEN: usize = 80;

/// Turns a title into a URL friendly slug.
///
/// Only ASCII letters and digits are kept. Runs of whitespace, dashes and
/// underscores become a single dash. Returns `fallback` if nothing is left.
#[must_use]
pub fn slugify(title: &str, fallback: &str) -> String {
    let mut slug = String::with_capacity(title.len().min(MAX_SLUG_LEN));
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            let dash = pending_dash && !slug.is_empty();
            if slug.len() + usize::from(dash) + 1 > MAX_SLUG_LEN {
                break;
            }
            if dash {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

/// Slug candidates: `base`, `base-2`, `base-3` and so on.
pub(crate) fn candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}
