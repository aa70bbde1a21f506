//! File-name and display helpers.

const DEFAULT_FILENAME: &str = "output";

/// Turn arbitrary text into a file-system-safe stem.
///
/// Characters outside `[A-Za-z0-9-_. ]` become `_`, the result is cut to `max_len`
/// characters, trailing dots and spaces are removed, and an empty result becomes `output`.
pub fn safe_filename(text: &str, max_len: usize) -> String {
    let mut name: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .take(max_len)
        .collect();
    let trimmed = name.trim_end_matches(['.', ' ']).len();
    name.truncate(trimmed);
    if name.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        name
    }
}

/// The first `max_chars` characters of `text`, never splitting a UTF-8 sequence.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("Hello, World!", 50), "Hello_ World_");
        assert_eq!(safe_filename("a/b\\c", 50), "a_b_c");
        assert_eq!(safe_filename("trailing... ", 50), "trailing");
        assert_eq!(safe_filename("...", 50), "output");
        assert_eq!(safe_filename("", 50), "output");
        assert_eq!(safe_filename("abcdefgh", 3), "abc");
        assert_eq!(safe_filename("你好", 50), "__");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("hello", 3), "hel");
        assert_eq!(preview("hi", 10), "hi");
        assert_eq!(preview("こんにちは", 2), "こん");
    }
}
