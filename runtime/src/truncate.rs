//! Length cap applied before text is sent for classification.

/// Cut `text` to at most `max_bytes` bytes.
///
/// The cut ignores words and sentences. When `max_bytes` lands inside a
/// multi-byte character the cut moves back to that character's start.
pub fn truncate_bytes(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
