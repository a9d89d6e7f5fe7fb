//! Cut strings to a maximum length, marking the cut with an ellipsis.
//!
//! Lengths count characters, not bytes. The ellipsis counts toward the limit, so a
//! shortened value is exactly `max_len` characters long. A limit shorter than the
//! ellipsis leaves only its first `max_len` characters.

pub const ELLIPSIS: &str = "...";

/// Keep the start of `value`.
pub fn left(value: &str, max_len: usize, ellipsis: &str) -> String {
    let len = value.chars().count();
    if len <= max_len {
        return value.to_string();
    }
    let ellipsis_len = ellipsis.chars().count();
    if ellipsis_len >= max_len {
        return ellipsis.chars().take(max_len).collect();
    }
    let keep = max_len - ellipsis_len;
    let mut shortened: String = value.chars().take(keep).collect();
    shortened.push_str(ellipsis);
    shortened
}

/// Keep the end of `value`.
pub fn right(value: &str, max_len: usize, ellipsis: &str) -> String {
    let len = value.chars().count();
    if len <= max_len {
        return value.to_string();
    }
    let ellipsis_len = ellipsis.chars().count();
    if ellipsis_len >= max_len {
        return ellipsis.chars().take(max_len).collect();
    }
    let keep = max_len - ellipsis_len;
    let mut shortened = ellipsis.to_string();
    shortened.extend(value.chars().skip(len - keep));
    shortened
}
