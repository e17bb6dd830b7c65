//! File marker scanning

use std::borrow::Cow;

use crate::archive::{
    fix_nl, MARKER_PREFIX, MARKER_PREFIX_LEN, MARKER_SUFFIX, MARKER_SUFFIX_LEN, NEWLINE_MARKER,
};

/// Result of scanning for the next file marker line.
///
/// `before` borrows from the scanned text unless no marker was found, in
/// which case it is the whole text with a trailing newline added if needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker<'a> {
    /// Text strictly before the marker line
    pub before: Cow<'a, str>,
    /// Trimmed file name, or `None` when the text holds no further marker
    pub name: Option<&'a str>,
    /// Text after the marker line's newline (empty when `name` is `None`)
    pub after: &'a str,
}

/// Find the next file marker line in `data`.
///
/// A marker can only start at offset 0 or right after a newline, so the scan
/// alternates between validating the line at the cursor and jumping to the
/// next `"\n-- "` occurrence.
pub fn find_marker(data: &str) -> Marker<'_> {
    let mut i = 0;
    loop {
        let tail = &data[i..];
        if let Some((name, after)) = is_marker(tail) {
            return Marker {
                before: Cow::Borrowed(&data[..i]),
                name: Some(name),
                after,
            };
        }

        match tail.find(NEWLINE_MARKER) {
            // Land on the '-' just past the newline.
            Some(j) => i += j + 1,
            None => {
                return Marker {
                    before: fix_nl(data),
                    name: None,
                    after: "",
                }
            }
        }
    }
}

/// Check whether `data` begins with a file marker line.
///
/// Returns the trimmed name and the text following the line. A line with an
/// empty name after trimming is ordinary text.
pub fn is_marker(data: &str) -> Option<(&str, &str)> {
    if !data.starts_with(MARKER_PREFIX) {
        return None;
    }

    let (line, after) = match data.find('\n') {
        Some(i) => (&data[..i], &data[i + 1..]),
        None => (data, ""),
    };

    if !line.ends_with(MARKER_SUFFIX) || line.len() < MARKER_PREFIX_LEN + MARKER_SUFFIX_LEN {
        return None;
    }

    let name = line[MARKER_PREFIX_LEN..line.len() - MARKER_SUFFIX_LEN].trim();
    if name.is_empty() {
        return None;
    }

    Some((name, after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("-- a.txt --\nrest", Some(("a.txt", "rest")))]
    #[case::no_newline("-- a.txt --", Some(("a.txt", "")))]
    #[case::padded_name("--   spaced name   --\n", Some(("spaced name", "")))]
    #[case::empty_name("--  --\nbody\n", None)]
    #[case::overlapping_delims("-- --\n", None)]
    #[case::missing_suffix("-- a.txt\n", None)]
    #[case::suffix_on_next_line("-- a.txt\n --\n", None)]
    #[case::indented(" -- a.txt --\n", None)]
    #[case::carriage_return("-- a.txt --\r\n", None)]
    #[case::not_at_start("foo -- x --\n", None)]
    fn test_is_marker(#[case] input: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(is_marker(input), expected);
    }

    #[test]
    fn test_find_marker_at_start() {
        let m = find_marker("-- a --\nA\n");
        assert_eq!(m.before, "");
        assert_eq!(m.name, Some("a"));
        assert_eq!(m.after, "A\n");
    }

    #[test]
    fn test_find_marker_after_comment() {
        let m = find_marker("comment\n-- a --\nA\n");
        assert_eq!(m.before, "comment\n");
        assert!(matches!(m.before, Cow::Borrowed(_)));
        assert_eq!(m.name, Some("a"));
        assert_eq!(m.after, "A\n");
    }

    #[test]
    fn test_find_marker_skips_near_misses() {
        let input = "x\n-- not a marker\n--  --\n-- b --\nB";
        let m = find_marker(input);
        assert_eq!(m.before, "x\n-- not a marker\n--  --\n");
        assert_eq!(m.name, Some("b"));
        assert_eq!(m.after, "B");
    }

    #[test]
    fn test_find_marker_ignores_mid_line_pattern() {
        let m = find_marker("foo -- x --\nbar");
        assert_eq!(m.name, None);
        assert_eq!(m.before, "foo -- x --\nbar\n");
        assert_eq!(m.after, "");
    }

    #[test]
    fn test_find_marker_none_keeps_terminated_text() {
        let m = find_marker("hello\nworld\n");
        assert_eq!(m.name, None);
        assert!(matches!(m.before, Cow::Borrowed("hello\nworld\n")));
    }

    #[test]
    fn test_find_marker_empty_input() {
        let m = find_marker("");
        assert_eq!(m.before, "");
        assert_eq!(m.name, None);
        assert_eq!(m.after, "");
    }

    #[test]
    fn test_find_marker_last_line_without_newline() {
        let m = find_marker("data\n-- last --");
        assert_eq!(m.before, "data\n");
        assert_eq!(m.name, Some("last"));
        assert_eq!(m.after, "");
    }

    #[test]
    fn test_find_marker_multibyte_text() {
        let m = find_marker("日本語\n-- 文件.txt --\n内容\n");
        assert_eq!(m.before, "日本語\n");
        assert_eq!(m.name, Some("文件.txt"));
        assert_eq!(m.after, "内容\n");
    }
}
