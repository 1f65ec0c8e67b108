//! Locating an anchor for content that has no delimiter in the target yet

use crate::chunk::Anchor;
use crate::error::Result;
use crate::pattern::literal_regex;

/// Where wrapped content goes relative to a located anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// Insert at `offset`, followed by a newline (anchor text follows)
    Before(usize),
    /// Insert at `offset`, preceded by a newline (anchor text precedes)
    After(usize),
}

impl Insertion {
    /// Splice `wrapped` into `text` at this insertion point.
    pub fn splice(&self, text: &str, wrapped: &str) -> String {
        let mut out = String::with_capacity(text.len() + wrapped.len() + 1);
        match *self {
            Self::Before(offset) => {
                out.push_str(&text[..offset]);
                out.push_str(wrapped);
                out.push('\n');
                out.push_str(&text[offset..]);
            }
            Self::After(offset) => {
                out.push_str(&text[..offset]);
                out.push('\n');
                out.push_str(wrapped);
                out.push_str(&text[offset..]);
            }
        }
        out
    }
}

/// Find the first occurrence of the anchor text in `text`.
///
/// Matching is literal and case-insensitive. `Ok(None)` means the anchor is
/// absent and the caller should fall back to appending.
pub fn resolve(text: &str, anchor: &Anchor) -> Result<Option<Insertion>> {
    if anchor.text().is_empty() {
        return Ok(None);
    }
    let regex = literal_regex(anchor.text())?;
    Ok(regex.find(text).map(|found| match anchor {
        Anchor::Before(_) => Insertion::Before(found.start()),
        Anchor::After(_) => Insertion::After(found.end()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WRAPPED: &str = "<!-- hello -->\n\nhello world\n\n<!-- hello -->";

    #[test]
    fn test_before_anchor_splice() {
        let text = "# Title\n\n## Options\nrest";
        let insertion = resolve(text, &Anchor::Before("## Options".into()))
            .unwrap()
            .unwrap();
        assert_eq!(
            insertion.splice(text, WRAPPED),
            format!("# Title\n\n{}\n## Options\nrest", WRAPPED)
        );
    }

    #[test]
    fn test_after_anchor_splice() {
        let text = "# Title\n\n## Options\nrest";
        let insertion = resolve(text, &Anchor::After("## Options".into()))
            .unwrap()
            .unwrap();
        assert_eq!(
            insertion.splice(text, WRAPPED),
            format!("# Title\n\n## Options\n{}\nrest", WRAPPED)
        );
    }

    #[test]
    fn test_anchor_case_insensitive_keeps_original_text() {
        let text = "## OPTIONS";
        let insertion = resolve(text, &Anchor::After("## options".into()))
            .unwrap()
            .unwrap();
        assert_eq!(insertion.splice(text, "X"), "## OPTIONS\nX");
    }

    #[test]
    fn test_missing_anchor_is_none() {
        let found = resolve("nothing here", &Anchor::Before("I do not exist".into())).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_anchor_uses_first_occurrence() {
        let found = resolve("ab ab", &Anchor::Before("ab".into())).unwrap();
        assert_eq!(found, Some(Insertion::Before(0)));
    }
}
