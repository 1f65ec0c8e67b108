//! Batch runner: apply chunks in order and aggregate the outcomes

use std::collections::HashSet;

use scaffold_fs::NormalizedPath;
use tracing::{info, warn};

use crate::apply::{ApplyOptions, ApplyOutcome, ChunkApplier, Outcome};
use crate::chunk::ChunkSpec;
use crate::condition::SkipReason;
use crate::report::InjectReport;
use crate::source::SourceFetcher;
use crate::store::{OverlayTargetStore, TargetStore};

/// Options for a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Permit re-injection over double-pattern regions, and bypass the
    /// fresh-target guard
    pub force: bool,
    /// Compute outcomes without touching the filesystem
    pub preview: bool,
    /// Targets written by this scaffolding run. When set, chunks aimed at
    /// other pre-existing targets are skipped unless `force` is set.
    pub fresh_targets: Option<HashSet<NormalizedPath>>,
}

/// Applies a sequence of chunks.
///
/// Chunks run strictly in the order given, each against a fresh read of its
/// target, so two chunks on the same file see each other's writes. In
/// preview the writes are staged in an [`OverlayTargetStore`] instead, which
/// keeps that chaining without touching the real store.
pub struct BatchRunner<'a> {
    store: &'a dyn TargetStore,
    fetcher: &'a dyn SourceFetcher,
    options: BatchOptions,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        store: &'a dyn TargetStore,
        fetcher: &'a dyn SourceFetcher,
        options: BatchOptions,
    ) -> Self {
        Self {
            store,
            fetcher,
            options,
        }
    }

    /// Apply every chunk. Per-chunk failures are recorded, never raised.
    pub fn run(&self, chunks: &[ChunkSpec]) -> InjectReport {
        let overlay = self
            .options
            .preview
            .then(|| OverlayTargetStore::new(self.store));
        let store: &dyn TargetStore = match &overlay {
            Some(overlay) => overlay,
            None => self.store,
        };
        let applier = ChunkApplier::new(
            store,
            self.fetcher,
            ApplyOptions {
                force: self.options.force,
                preview: self.options.preview,
            },
        );

        let mut outcomes: Vec<ApplyOutcome> = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let outcome = self.run_one(&applier, store, chunk);
            if let (Some(overlay), Outcome::Injected { content, .. }) = (&overlay, &outcome.outcome) {
                if let Err(e) = overlay.write(&outcome.target, content) {
                    warn!(target = %outcome.target, error = %e, "could not stage preview content");
                }
            }
            outcomes.push(outcome);
        }

        let report = InjectReport::new(outcomes);
        for failed in report.failed() {
            warn!(chunk = %failed, "chunk failed");
        }
        info!("{}", report.summary());
        report
    }

    fn run_one(
        &self,
        applier: &ChunkApplier<'_>,
        store: &dyn TargetStore,
        chunk: &ChunkSpec,
    ) -> ApplyOutcome {
        match self.guard_fresh(store, chunk) {
            Ok(None) => applier.apply(chunk),
            Ok(Some(reason)) => applier.tag(chunk, Outcome::Skipped(reason)),
            Err(e) => applier.tag(chunk, Outcome::Failed(e)),
        }
    }

    /// Protect targets that existed before scaffolding.
    fn guard_fresh(
        &self,
        store: &dyn TargetStore,
        chunk: &ChunkSpec,
    ) -> crate::Result<Option<SkipReason>> {
        let Some(fresh) = &self.options.fresh_targets else {
            return Ok(None);
        };
        if self.options.force || fresh.contains(&chunk.target) {
            return Ok(None);
        }
        if store.read(&chunk.target)?.exists {
            return Ok(Some(SkipReason::TargetNotFresh));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{Condition, Source};
    use crate::error::Error;
    use crate::store::MemoryTargetStore;
    use pretty_assertions::assert_eq;

    fn echo(source: &Source) -> crate::Result<String> {
        match source {
            Source::Command(cmd) => Ok(cmd.trim_start_matches("echo ").to_string()),
            other => Err(Error::fetch(other.describe(), "unsupported")),
        }
    }

    #[test]
    fn test_same_target_chunks_see_each_other() {
        let store = MemoryTargetStore::new();
        let runner = BatchRunner::new(&store, &echo, BatchOptions::default());
        let chunks = vec![
            ChunkSpec::new("one", "a.md", Source::Command("echo 1".into())),
            ChunkSpec::new("two", "a.md", Source::Command("echo 2".into())),
        ];

        let report = runner.run(&chunks);

        assert_eq!(report.injected().len(), 2);
        assert_eq!(
            store.get("a.md").unwrap(),
            "<!-- one -->\n\n1\n\n<!-- one -->\n\n<!-- two -->\n\n2\n\n<!-- two -->"
        );
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let store = MemoryTargetStore::new();
        let runner = BatchRunner::new(&store, &echo, BatchOptions::default());
        let chunks = vec![
            ChunkSpec::new("bad", "a.md", Source::File("missing.md".into())),
            ChunkSpec::new("good", "b.md", Source::Command("echo ok".into())),
        ];

        let report = runner.run(&chunks);

        assert_eq!(report.failed().len(), 1);
        assert_eq!(report.injected().len(), 1);
        assert!(store.get("b.md").is_some());
        assert!(store.get("a.md").is_none());
    }

    #[test]
    fn test_fresh_guard_skips_preexisting_targets() {
        let store = MemoryTargetStore::new().with_file("old.md", "mine");
        let options = BatchOptions {
            fresh_targets: Some(HashSet::from([NormalizedPath::new("new.md")])),
            ..Default::default()
        };
        let runner = BatchRunner::new(&store, &echo, options);
        let chunks = vec![
            ChunkSpec::new("x", "old.md", Source::Command("echo 1".into())),
            ChunkSpec::new("x", "new.md", Source::Command("echo 1".into())),
            ChunkSpec::new("x", "absent.md", Source::Command("echo 1".into())),
        ];

        let report = runner.run(&chunks);

        assert_eq!(store.get("old.md").as_deref(), Some("mine"));
        assert!(matches!(
            report.outcomes[0].outcome,
            Outcome::Skipped(SkipReason::TargetNotFresh)
        ));
        assert!(report.outcomes[1].is_injected());
        assert!(report.outcomes[2].is_injected());
    }

    #[test]
    fn test_preview_chains_same_target_like_a_real_run() {
        let chunks = vec![
            ChunkSpec::new("one", "a.md", Source::Command("echo 1".into())),
            ChunkSpec::new("two", "a.md", Source::Command("echo 2".into())),
        ];
        let real_store = MemoryTargetStore::new();
        let real = BatchRunner::new(&real_store, &echo, BatchOptions::default()).run(&chunks);
        let preview_store = MemoryTargetStore::new();
        let options = BatchOptions {
            preview: true,
            ..Default::default()
        };

        let preview = BatchRunner::new(&preview_store, &echo, options).run(&chunks);

        assert!(preview_store.is_empty());
        for (real, preview) in real.outcomes.iter().zip(&preview.outcomes) {
            match (&real.outcome, &preview.outcome) {
                (
                    Outcome::Injected {
                        condition: real_condition,
                        content: real_content,
                        ..
                    },
                    Outcome::Injected {
                        condition, content, ..
                    },
                ) => {
                    assert_eq!(condition, real_condition);
                    assert_eq!(content, real_content);
                }
                other => panic!("expected both injected, got {other:?}"),
            }
        }
        assert!(matches!(
            preview.outcomes[1].outcome,
            Outcome::Injected {
                condition: Condition::NoPattern,
                ..
            }
        ));
    }

    #[test]
    fn test_force_bypasses_fresh_guard() {
        let store = MemoryTargetStore::new().with_file("old.md", "mine");
        let options = BatchOptions {
            force: true,
            fresh_targets: Some(HashSet::new()),
            ..Default::default()
        };
        let runner = BatchRunner::new(&store, &echo, options);

        let report = runner.run(&[ChunkSpec::new("x", "old.md", Source::Command("echo 1".into()))]);

        assert!(report.outcomes[0].is_injected());
    }
}
