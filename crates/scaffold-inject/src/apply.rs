//! Chunk applier: fetch, classify, place, write.

use std::ops::Range;

use scaffold_fs::{NormalizedPath, TargetState};
use tracing::{debug, info};

use crate::anchor;
use crate::chunk::{Anchor, ChunkSpec, Condition};
use crate::condition::{SkipReason, TargetCondition, admit, classify};
use crate::error::{Error, Result};
use crate::pattern::PatternMatcher;
use crate::preview;
use crate::source::SourceFetcher;
use crate::store::TargetStore;
use crate::wrap::{trim_line_breaks, wrap_content};

/// Caller-level switches for an apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Permit re-injection over an existing double-pattern region
    pub force: bool,
    /// Compute everything, write nothing
    pub preview: bool,
}

/// What a chunk would do to its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Write { condition: Condition, content: String },
    Skip(SkipReason),
}

/// Result of applying one chunk.
#[derive(Debug)]
pub enum Outcome {
    Injected {
        condition: Condition,
        /// Target state the new content was computed from
        previous: TargetState,
        content: String,
    },
    Skipped(SkipReason),
    Failed(Error),
}

/// An [`Outcome`] tagged with what it was about.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub chunk_id: String,
    pub target: NormalizedPath,
    pub source: String,
    pub outcome: Outcome,
}

impl ApplyOutcome {
    pub fn is_injected(&self) -> bool {
        matches!(self.outcome, Outcome::Injected { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, Outcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }

    /// New content for an injected outcome
    pub fn content(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Injected { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Unified diff of the change, for injected outcomes only
    pub fn diff(&self) -> Option<String> {
        match &self.outcome {
            Outcome::Injected {
                previous, content, ..
            } => Some(preview::unified_diff(
                self.target.as_str(),
                &previous.content,
                content,
            )),
            _ => None,
        }
    }
}

/// Compute the new target content for a chunk, given resolved source text.
///
/// Pure: no I/O. The wrapped text is computed once and reused by whichever
/// placement branch applies.
pub fn plan_injection(
    chunk: &ChunkSpec,
    target: &TargetState,
    source_content: &str,
    force: bool,
) -> Result<Plan> {
    let matcher = PatternMatcher::new(&chunk.id, &chunk.pattern)?;
    let state = classify(target, &matcher);
    debug!(chunk = %chunk.id, target = %chunk.target, condition = %state.condition(), "classified target");

    if let Err(reason) = admit(&state, &chunk.allowed, force) {
        return Ok(Plan::Skip(reason));
    }

    let wrapped = wrap_content(&matcher.strip(source_content), &chunk.effective_wrap());

    let content = match &state {
        TargetCondition::NoFile => wrapped,
        TargetCondition::NoPattern => place_new(&target.content, chunk.anchor.as_ref(), &wrapped)?,
        TargetCondition::SinglePattern(span) | TargetCondition::DoublePattern(span) => {
            replace_span(&target.content, span.clone(), &wrapped)
        }
    };

    Ok(Plan::Write {
        condition: state.condition(),
        content,
    })
}

/// Place content in a target that has no delimiter yet.
fn place_new(existing: &str, anchor: Option<&Anchor>, wrapped: &str) -> Result<String> {
    if let Some(anchor) = anchor {
        match anchor::resolve(existing, anchor)? {
            Some(insertion) => return Ok(insertion.splice(existing, wrapped)),
            None => debug!(anchor = anchor.text(), "anchor not found, appending"),
        }
    }
    Ok(append(existing, wrapped))
}

/// Append after existing content, separated by exactly one blank line.
fn append(existing: &str, wrapped: &str) -> String {
    if existing.trim().is_empty() {
        return wrapped.to_string();
    }
    format!("{}\n\n{}", trim_line_breaks(existing), wrapped)
}

fn replace_span(existing: &str, span: Range<usize>, wrapped: &str) -> String {
    let mut out = String::with_capacity(existing.len() - span.len() + wrapped.len());
    out.push_str(&existing[..span.start]);
    out.push_str(wrapped);
    out.push_str(&existing[span.end..]);
    out
}

/// Applies chunks against a target store using a source fetcher.
pub struct ChunkApplier<'a> {
    store: &'a dyn TargetStore,
    fetcher: &'a dyn SourceFetcher,
    options: ApplyOptions,
}

impl<'a> ChunkApplier<'a> {
    pub fn new(
        store: &'a dyn TargetStore,
        fetcher: &'a dyn SourceFetcher,
        options: ApplyOptions,
    ) -> Self {
        Self {
            store,
            fetcher,
            options,
        }
    }

    /// Apply one chunk. Never fails as a whole; errors become `Outcome::Failed`.
    pub fn apply(&self, chunk: &ChunkSpec) -> ApplyOutcome {
        let outcome = match self.try_apply(chunk) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Failed(e),
        };
        self.tag(chunk, outcome)
    }

    pub(crate) fn tag(&self, chunk: &ChunkSpec, outcome: Outcome) -> ApplyOutcome {
        ApplyOutcome {
            chunk_id: chunk.id.clone(),
            target: chunk.target.clone(),
            source: chunk.source.describe().to_string(),
            outcome,
        }
    }

    fn try_apply(&self, chunk: &ChunkSpec) -> Result<Outcome> {
        // Source is resolved once, before classification, even in preview
        let source_content = self.fetcher.fetch(&chunk.source)?;
        let previous = self.store.read(&chunk.target)?;

        match plan_injection(chunk, &previous, &source_content, self.options.force)? {
            Plan::Skip(reason) => {
                debug!(chunk = %chunk.id, target = %chunk.target, %reason, "chunk skipped");
                Ok(Outcome::Skipped(reason))
            }
            Plan::Write { condition, content } => {
                if self.options.preview {
                    info!(chunk = %chunk.id, target = %chunk.target, %condition, "would inject chunk");
                } else {
                    self.store.write(&chunk.target, &content)?;
                    info!(chunk = %chunk.id, target = %chunk.target, %condition, "injected chunk");
                }
                Ok(Outcome::Injected {
                    condition,
                    previous,
                    content,
                })
            }
        }
    }
}
