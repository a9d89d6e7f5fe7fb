//! Slash normalization and path joining for resource URLs.
//!
//! Every helper is idempotent: applying it to its own output changes nothing.

const SEPARATOR: char = '/';

/// `uri` with exactly one trailing `/`.
pub fn ensure_ends_with_slash(uri: &str) -> String {
    format!("{}{SEPARATOR}", uri.trim_end_matches(SEPARATOR))
}

/// `uri` with exactly one leading `/`.
pub fn ensure_starts_with_slash(uri: &str) -> String {
    format!("{SEPARATOR}{}", uri.trim_start_matches(SEPARATOR))
}

/// `path` with exactly one leading and one trailing `/`.
pub fn ensure_starts_and_ends_with_slash(path: &str) -> String {
    let trimmed = path.trim_matches(SEPARATOR);
    if trimmed.is_empty() {
        return SEPARATOR.to_string();
    }
    format!("{SEPARATOR}{trimmed}{SEPARATOR}")
}

/// Append `segments` to `base`, separated by exactly one `/`.
///
/// Leading and trailing separators on the base and on every segment are ignored,
/// empty segments are skipped, and the result never ends with a separator.
pub fn join<S: AsRef<str>>(base: &str, segments: &[S]) -> String {
    let mut url = base.trim_end_matches(SEPARATOR).to_string();
    for segment in segments {
        let segment = segment.as_ref().trim_matches(SEPARATOR);
        if segment.is_empty() {
            continue;
        }
        url.push(SEPARATOR);
        url.push_str(segment);
    }
    url
}

/// Percent-encode `value` for use as one path segment.
///
/// Only ASCII alphanumerics and `*-._` pass through, so `/`, `?`, `#` and spaces
/// cannot change the shape of the URL.
pub fn encode_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .map(|chunk| if chunk == "+" { "%20" } else { chunk })
        .collect()
}
