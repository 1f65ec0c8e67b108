//! Chunk specifications: one immutable injection rule per target file

use std::collections::BTreeSet;
use std::fmt;

use scaffold_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

/// The state a target is in with respect to a chunk's delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// Target file does not exist
    NoFile,
    /// Target exists, delimiter absent
    NoPattern,
    /// Target exists, delimiter occurs exactly once
    SinglePattern,
    /// Target exists, delimiter occurs two or more times
    DoublePattern,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::NoFile,
        Condition::NoPattern,
        Condition::SinglePattern,
        Condition::DoublePattern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoFile => "no-file",
            Self::NoPattern => "no-pattern",
            Self::SinglePattern => "single-pattern",
            Self::DoublePattern => "double-pattern",
        }
    }

    /// Parse a condition from its kebab-case name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of conditions under which a chunk may fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditions {
    set: BTreeSet<Condition>,
}

impl Conditions {
    /// Every condition allowed
    pub fn all() -> Self {
        Self {
            set: Condition::ALL.into_iter().collect(),
        }
    }

    /// Only the given conditions (an `if` list)
    pub fn only(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            set: conditions.into_iter().collect(),
        }
    }

    /// Every condition except the given ones (an `ifnot` list)
    pub fn except(conditions: impl IntoIterator<Item = Condition>) -> Self {
        let mut set = Self::all();
        set.remove_all(conditions);
        set
    }

    pub fn remove_all(&mut self, conditions: impl IntoIterator<Item = Condition>) {
        for condition in conditions {
            self.set.remove(&condition);
        }
    }

    pub fn contains(&self, condition: Condition) -> bool {
        self.set.contains(&condition)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl Default for Conditions {
    fn default() -> Self {
        Self::all()
    }
}

/// Where a chunk's content comes from. Exactly one variant per chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Project-relative file path
    File(String),
    /// Remote text resource
    Url(String),
    /// Shell command; stdout is the content
    Command(String),
    /// Inline script code; its output is the content
    Script(String),
}

impl Source {
    /// Human-readable description used in logs and reports
    pub fn describe(&self) -> &str {
        match self {
            Self::File(path) => path,
            Self::Url(url) => url,
            Self::Command(command) => command,
            Self::Script(code) => code,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Markers placed around injected content. Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wrap {
    pub before: String,
    pub after: String,
}

impl Wrap {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    /// Delimit both sides with the same marker
    pub fn around(marker: &str) -> Self {
        Self::new(marker, marker)
    }

    /// No markers at all
    pub fn none() -> Self {
        Self::default()
    }
}

/// Existing text near which new content is placed when no delimiter exists yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    Before(String),
    After(String),
}

impl Anchor {
    pub fn text(&self) -> &str {
        match self {
            Self::Before(text) | Self::After(text) => text,
        }
    }
}

/// Default delimiter for a chunk id: `<!-- {id} -->`
pub fn default_pattern(id: &str) -> String {
    format!("<!-- {} -->", id)
}

/// One injection rule bound to a single target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpec {
    pub id: String,
    pub target: NormalizedPath,
    pub pattern: String,
    pub source: Source,
    /// Explicit markers; `None` means delimit with the pattern on both sides
    pub wrap: Option<Wrap>,
    pub anchor: Option<Anchor>,
    pub allowed: Conditions,
}

impl ChunkSpec {
    pub fn new(id: impl Into<String>, target: impl Into<NormalizedPath>, source: Source) -> Self {
        let id = id.into();
        Self {
            pattern: default_pattern(&id),
            id,
            target: target.into(),
            source,
            wrap: None,
            anchor: None,
            allowed: Conditions::all(),
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = Some(wrap);
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_allowed(mut self, allowed: Conditions) -> Self {
        self.allowed = allowed;
        self
    }

    /// Markers to use, falling back to the pattern on both sides
    pub fn effective_wrap(&self) -> Wrap {
        self.wrap
            .clone()
            .unwrap_or_else(|| Wrap::around(&self.pattern))
    }
}
