//! URL slug generation.

/// Builds a lowercase, hyphen-separated slug.
///
/// ASCII letters and digits are kept, whitespace and `-` become separators
/// and everything else (including `_`) is dropped. Runs of separators collapse
/// to a single hyphen and no hyphen is left at either end.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }

    slug
}
