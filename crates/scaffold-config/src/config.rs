//! Raw template configuration as written by template authors

use scaffold_fs::{NormalizedPath, read_text};
use scaffold_inject::Condition;
use serde::Deserialize;

use crate::Result;
use crate::store::ConfigStore;

/// A scalar or a list of scalars.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// The `command` key: a shell command, or `{script: code}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandValue {
    Shell(String),
    Script { script: String },
}

/// The `wrap` key in any of its accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawWrap {
    /// `true` wraps both sides with the pattern, `false` wraps neither
    Flag(bool),
    /// `before` or `after`
    Side(String),
    /// Any of `before`, `after`; empty means no wrap
    Sides(Vec<String>),
    /// Literal markers
    Markers {
        #[serde(default)]
        before: Option<String>,
        #[serde(default)]
        after: Option<String>,
    },
}

/// One `inject:` entry before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawChunk {
    pub id: Option<String>,
    pub target: Option<OneOrMany<String>>,
    pub pattern: Option<String>,
    pub file: Option<String>,
    pub url: Option<String>,
    pub command: Option<CommandValue>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub wrap: Option<RawWrap>,
    #[serde(rename = "if")]
    pub if_conditions: Option<OneOrMany<Condition>>,
    #[serde(rename = "ifnot")]
    pub ifnot_conditions: Option<OneOrMany<Condition>>,
}

/// The template configuration document.
///
/// Keys owned by other parts of the scaffolder (`ask`, `pre-run`,
/// `post-run`, `symlink`, ...) are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub inject: Vec<RawChunk>,
    #[serde(default)]
    pub ignore: Vec<String>,
    pub replace_pattern: Option<String>,
    pub replace_filter: Option<String>,
}

impl TemplateConfig {
    /// Load a configuration file; an empty file is an empty configuration.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = read_text(path)?;
        Self::parse(path, &content)
    }

    /// Parse configuration text, choosing the format from `path`'s extension.
    pub fn parse(path: &NormalizedPath, content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        ConfigStore::parse(path, path.extension().unwrap_or(""), content)
    }

    /// Parse YAML configuration text
    pub fn from_yaml(content: &str) -> Result<Self> {
        Self::parse(&NormalizedPath::new(".scaffold.yml"), content)
    }
}
