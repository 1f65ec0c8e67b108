//! Wrapping resolved source content with its markers

use crate::chunk::Wrap;

/// Separator between a marker and the wrapped content
const MARKER_GAP: &str = "\n\n";

/// Strip line breaks from both ends of `text`, leaving other whitespace.
pub fn trim_line_breaks(text: &str) -> &str {
    text.trim_matches(|c| c == '\n' || c == '\r')
}

/// Produce the exact text to insert for a chunk.
///
/// The result is `before`, a blank line, the trimmed content, a blank line,
/// then `after`. An empty marker drops its side's separator as well.
pub fn wrap_content(content: &str, wrap: &Wrap) -> String {
    let body = trim_line_breaks(content);
    let mut out = String::with_capacity(wrap.before.len() + body.len() + wrap.after.len() + 4);

    if !wrap.before.is_empty() {
        out.push_str(&wrap.before);
        out.push_str(MARKER_GAP);
    }
    out.push_str(body);
    if !wrap.after.is_empty() {
        out.push_str(MARKER_GAP);
        out.push_str(&wrap.after);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrap_both_sides() {
        let wrapped = wrap_content("X", &Wrap::around("<!-- id -->"));
        assert_eq!(wrapped, "<!-- id -->\n\nX\n\n<!-- id -->");
    }

    #[test]
    fn test_wrap_before_only() {
        let wrapped = wrap_content("X\n", &Wrap::new("<!-- id -->", ""));
        assert_eq!(wrapped, "<!-- id -->\n\nX");
    }

    #[test]
    fn test_wrap_after_only() {
        let wrapped = wrap_content("\nX", &Wrap::new("", "<!-- id -->"));
        assert_eq!(wrapped, "X\n\n<!-- id -->");
    }

    #[test]
    fn test_wrap_none_is_trimmed_content() {
        assert_eq!(wrap_content("\r\n\nX\n\r\n", &Wrap::none()), "X");
    }

    #[test]
    fn test_trim_keeps_indentation() {
        assert_eq!(trim_line_breaks("\n    indented\n  \n"), "    indented\n  ");
    }
}
