//! Literal, case-insensitive delimiter matching.
//!
//! The delimiter is escaped before it reaches the regex engine, so `.*` in a
//! pattern only ever matches the two characters `.*`.

use std::borrow::Cow;
use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};

/// How often a delimiter occurs in a body of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternMatch {
    /// No occurrence
    None,
    /// Exactly one occurrence; the span of that occurrence
    Single(Range<usize>),
    /// Two or more; the span from the start of the first occurrence to the
    /// end of the last one
    Double(Range<usize>),
}

/// Compiled matcher for a single delimiter string.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    /// Build a matcher for `pattern` treated as literal text.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyPattern` for an empty delimiter, which would
    /// otherwise match at every position.
    pub fn new(chunk_id: &str, pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::EmptyPattern {
                chunk_id: chunk_id.to_string(),
            });
        }
        let regex = literal_regex(pattern)?;
        Ok(Self { regex })
    }

    /// Classify the occurrences of the delimiter in `text`.
    pub fn find(&self, text: &str) -> PatternMatch {
        let mut occurrences = self.regex.find_iter(text);
        let Some(first) = occurrences.next() else {
            return PatternMatch::None;
        };
        match occurrences.last() {
            Some(last) => PatternMatch::Double(first.start()..last.end()),
            None => PatternMatch::Single(first.range()),
        }
    }

    /// Remove every occurrence of the delimiter from `text`.
    pub fn strip<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.regex.replace_all(text, "")
    }
}

/// Case-insensitive regex matching `text` literally.
pub(crate) fn literal_regex(text: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(&regex::escape(text))
        .case_insensitive(true)
        .build()?)
}
