//! Resolution of raw `inject:` entries into chunk specifications

use regex::RegexBuilder;
use scaffold_inject::{
    Anchor, ChunkSpec, Conditions, DEFAULT_PLACEHOLDER_FORMAT, Replacements, Source, Wrap,
    default_pattern,
};
use tracing::{debug, warn};

use crate::config::{CommandValue, OneOrMany, RawChunk, RawWrap, TemplateConfig};
use crate::{Error, Result};

/// Turns a [`TemplateConfig`] into engine-ready chunks.
///
/// Malformed entries are dropped with a warning so one bad entry never
/// blocks the rest of the template.
#[derive(Debug, Clone, Default)]
pub struct ChunkResolver {
    base_url: Option<String>,
    ignore: Vec<String>,
}

impl ChunkResolver {
    pub fn new(config: &TemplateConfig) -> Self {
        Self {
            base_url: None,
            ignore: config.ignore.clone(),
        }
    }

    /// Base URL of the template; ignored `file` sources are fetched from here
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Resolve every entry, expanding multi-target entries in order.
    pub fn resolve(&self, config: &TemplateConfig) -> Vec<ChunkSpec> {
        config
            .inject
            .iter()
            .enumerate()
            .flat_map(|(index, raw)| match self.resolve_entry(raw) {
                Ok(chunks) => chunks,
                Err(reason) => {
                    warn!(entry = index, id = raw.id.as_deref().unwrap_or(""), "dropping inject entry: {}", reason);
                    Vec::new()
                }
            })
            .collect()
    }

    fn resolve_entry(&self, raw: &RawChunk) -> std::result::Result<Vec<ChunkSpec>, String> {
        let id = raw
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or("missing id")?;
        let targets: Vec<String> = raw
            .target
            .clone()
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect();
        if targets.is_empty() {
            return Err("missing target".into());
        }

        let pattern = match raw.pattern.as_deref() {
            Some("") => return Err("empty pattern".into()),
            Some(pattern) => pattern.to_string(),
            None => default_pattern(id),
        };
        let source = self.source(raw)?;
        let allowed = allowed_conditions(raw);
        if allowed.is_empty() {
            return Err("if/ifnot leave no condition under which the chunk can fire".into());
        }
        let wrap = raw.wrap.as_ref().map(|w| resolve_wrap(w, &pattern));
        let anchor = match (&raw.before, &raw.after) {
            (Some(before), _) => Some(Anchor::Before(before.clone())),
            (None, Some(after)) => Some(Anchor::After(after.clone())),
            (None, None) => None,
        };

        Ok(targets
            .into_iter()
            .map(|target| ChunkSpec {
                id: id.to_string(),
                target: target.into(),
                pattern: pattern.clone(),
                source: source.clone(),
                wrap: wrap.clone(),
                anchor: anchor.clone(),
                allowed: allowed.clone(),
            })
            .collect())
    }

    fn source(&self, raw: &RawChunk) -> std::result::Result<Source, String> {
        if let Some(file) = raw.file.as_deref().filter(|f| !f.is_empty()) {
            return Ok(self.file_source(file));
        }
        if let Some(url) = raw.url.as_deref().filter(|u| !u.is_empty()) {
            let lower = url.to_lowercase();
            if lower.starts_with("http://") || lower.starts_with("https://") {
                return Ok(Source::Url(url.to_string()));
            }
            return Err(format!("url '{}' is not http(s)", url));
        }
        match &raw.command {
            Some(CommandValue::Shell(command)) if !command.is_empty() => {
                Ok(Source::Command(command.clone()))
            }
            Some(CommandValue::Script { script }) if !script.is_empty() => {
                Ok(Source::Script(script.clone()))
            }
            _ => Err("missing source (file, url or command)".into()),
        }
    }

    /// Files the template marks as ignored are not in the project; fetch
    /// them from the template instead.
    fn file_source(&self, file: &str) -> Source {
        match &self.base_url {
            Some(base_url) if self.is_ignored(file) => {
                debug!(file, "ignored file source fetched from template");
                Source::Url(format!("{}{}", base_url, file))
            }
            _ => Source::File(file.to_string()),
        }
    }

    fn is_ignored(&self, file: &str) -> bool {
        let file = file.to_lowercase();
        self.ignore.iter().any(|entry| {
            let entry = entry.trim_end_matches('/').to_lowercase();
            !entry.is_empty() && (file == entry || file.starts_with(&format!("{}/", entry)))
        })
    }
}

fn allowed_conditions(raw: &RawChunk) -> Conditions {
    let only: Vec<_> = raw
        .if_conditions
        .clone()
        .map(OneOrMany::into_vec)
        .unwrap_or_default();
    let mut allowed = if only.is_empty() {
        Conditions::all()
    } else {
        Conditions::only(only)
    };
    if let Some(except) = raw.ifnot_conditions.clone() {
        allowed.remove_all(except.into_vec());
    }
    allowed
}

fn resolve_wrap(raw: &RawWrap, pattern: &str) -> Wrap {
    let sides = |names: &[&str]| {
        let has = |side: &str| names.iter().any(|n| n.eq_ignore_ascii_case(side));
        for name in names {
            if !name.eq_ignore_ascii_case("before") && !name.eq_ignore_ascii_case("after") {
                warn!(side = *name, "unknown wrap side ignored");
            }
        }
        Wrap::new(
            if has("before") { pattern } else { "" },
            if has("after") { pattern } else { "" },
        )
    };

    match raw {
        RawWrap::Flag(true) => Wrap::around(pattern),
        RawWrap::Flag(false) => Wrap::none(),
        RawWrap::Side(side) => sides(&[side.as_str()]),
        RawWrap::Sides(list) => sides(&list.iter().map(String::as_str).collect::<Vec<_>>()),
        RawWrap::Markers { before, after } => Wrap::new(
            before.clone().unwrap_or_default(),
            after.clone().unwrap_or_default(),
        ),
    }
}

/// Build placeholder replacements for `file`/`url` sources from answers.
pub fn replacements<K, V>(
    config: &TemplateConfig,
    answers: impl IntoIterator<Item = (K, V)>,
) -> Result<Replacements>
where
    K: AsRef<str>,
    V: Into<String>,
{
    let format = config
        .replace_pattern
        .as_deref()
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_PLACEHOLDER_FORMAT);
    let replacements = Replacements::from_answers(format, answers)?;

    match config.replace_filter.as_deref() {
        Some(pattern) if !pattern.is_empty() => {
            let filter = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| Error::InvalidReplaceFilter {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
            Ok(replacements.with_filter(filter))
        }
        _ => Ok(replacements),
    }
}
