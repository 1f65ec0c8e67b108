//! Placeholder replacement in file and URL source content

use std::borrow::Cow;
use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::Result;

/// Default placeholder format; `%s` is replaced by the answer name
pub const DEFAULT_PLACEHOLDER_FORMAT: &str = "{{%s}}";

/// Placeholder substitutions built from answered questions.
#[derive(Debug, Clone, Default)]
pub struct Replacements {
    /// Lowercased placeholder -> value
    values: HashMap<String, String>,
    matcher: Option<Regex>,
    filter: Option<Regex>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build substitutions from answers, formatting each answer name with
    /// `format` (e.g. `{{%s}}` turns `project_name` into `{{project_name}}`).
    pub fn from_answers<K, V>(format: &str, answers: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let values: HashMap<String, String> = answers
            .into_iter()
            .map(|(name, value)| {
                (
                    format.replacen("%s", name.as_ref(), 1).to_lowercase(),
                    value.into(),
                )
            })
            .collect();

        if values.is_empty() {
            return Ok(Self::default());
        }

        // Longest first so a placeholder never shadows a longer one sharing its prefix
        let mut keys: Vec<&String> = values.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let matcher = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            values,
            matcher: Some(matcher),
            filter: None,
        })
    }

    /// Only substitute in sources whose path or URL matches `filter`
    pub fn with_filter(mut self, filter: Regex) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn applies_to(&self, origin: &str) -> bool {
        self.filter.as_ref().is_none_or(|f| f.is_match(origin))
    }

    /// Substitute every placeholder in `content` in a single pass.
    pub fn apply<'t>(&self, origin: &str, content: &'t str) -> Cow<'t, str> {
        match &self.matcher {
            Some(matcher) if self.applies_to(origin) => {
                matcher.replace_all(content, |caps: &regex::Captures<'_>| {
                    self.values
                        .get(&caps[0].to_lowercase())
                        .cloned()
                        .unwrap_or_default()
                })
            }
            _ => Cow::Borrowed(content),
        }
    }
}
