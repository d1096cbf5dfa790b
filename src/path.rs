/// Split `text` on every occurrence of `delimiter`.
///
/// Consecutive delimiters yield empty segments; they are kept as-is. An empty
/// delimiter splits the text into single characters.
///
/// ```
/// assert_eq!(flatbind::split_path("a.b..c", "."), ["a", "b", "", "c"]);
/// assert_eq!(flatbind::split_path("field0:nested", ":"), ["field0", "nested"]);
/// ```
pub fn split_path<'a>(text: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }
    text.split(delimiter).collect()
}

/// Whether `segments` starts with `prefix` and is strictly longer than it.
pub(crate) fn has_escape_prefix(segments: &[&str], prefix: &[&str]) -> bool {
    prefix.len() < segments.len() && segments.iter().zip(prefix).all(|(s, p)| s == p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_segments_are_preserved() {
        assert_eq!(split_path("", "."), [""]);
        assert_eq!(split_path(".a.", "."), ["", "a", ""]);
    }

    #[test]
    fn multi_character_delimiter() {
        assert_eq!(split_path("a::b::c", "::"), ["a", "b", "c"]);
    }

    #[test]
    fn empty_delimiter_splits_chars() {
        assert_eq!(split_path("aé", ""), ["a", "é"]);
    }

    #[test]
    fn escape_prefix_must_be_strictly_shorter() {
        assert!(has_escape_prefix(&["esc", "Field"], &["esc"]));
        assert!(!has_escape_prefix(&["esc"], &["esc"]));
        assert!(!has_escape_prefix(&["escape", "Field"], &["esc"]));
        assert!(has_escape_prefix(&["Field"], &[]));
    }
}
