//! Aggregated results of a batch run

use std::fmt;

use crate::apply::{ApplyOutcome, Outcome};

/// One line of the injected/skipped/failed display lists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChunkLog {
    pub target: String,
    pub source: String,
    pub error: Option<String>,
}

impl From<&ApplyOutcome> for ChunkLog {
    fn from(outcome: &ApplyOutcome) -> Self {
        let error = match &outcome.outcome {
            Outcome::Failed(e) => Some(e.to_string()),
            _ => None,
        };
        Self {
            target: outcome.target.to_string(),
            source: outcome.source.clone(),
            error,
        }
    }
}

impl fmt::Display for ChunkLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.target, self.source)?;
        if let Some(error) = &self.error {
            write!(f, " {}", error)?;
        }
        Ok(())
    }
}

/// Ordered outcomes of a batch, one per chunk.
#[derive(Debug, Default)]
pub struct InjectReport {
    pub outcomes: Vec<ApplyOutcome>,
}

impl InjectReport {
    pub fn new(outcomes: Vec<ApplyOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn injected(&self) -> Vec<ChunkLog> {
        self.logs(ApplyOutcome::is_injected)
    }

    pub fn skipped(&self) -> Vec<ChunkLog> {
        self.logs(ApplyOutcome::is_skipped)
    }

    pub fn failed(&self) -> Vec<ChunkLog> {
        self.logs(ApplyOutcome::is_failed)
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(ApplyOutcome::is_failed)
    }

    fn logs(&self, keep: impl Fn(&ApplyOutcome) -> bool) -> Vec<ChunkLog> {
        self.outcomes
            .iter()
            .filter(|o| keep(*o))
            .map(ChunkLog::from)
            .collect()
    }

    /// Sorted, deduplicated display lines for a list
    pub fn display(logs: &[ChunkLog]) -> Vec<String> {
        let mut lines: Vec<String> = logs.iter().map(ToString::to_string).collect();
        lines.sort();
        lines.dedup();
        lines
    }

    pub fn summary(&self) -> String {
        format!(
            "{} chunk(s) injected, {} skipped, {} failed",
            self.injected().len(),
            self.skipped().len(),
            self.failed().len()
        )
    }

    /// Environment variables describing the run, for post-run commands.
    pub fn env_vars(&self) -> Vec<(String, String)> {
        let render = |logs: &[ChunkLog]| {
            logs.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let sorted = |logs: &[ChunkLog]| Self::display(logs).join(", ");

        let injected = self.injected();
        let skipped = self.skipped();
        let failed = self.failed();
        let all: Vec<ChunkLog> = injected
            .iter()
            .chain(&skipped)
            .chain(&failed)
            .cloned()
            .collect();

        vec![
            ("SCAFFOLD_ALL_CHUNKS".to_string(), render(&all)),
            ("SCAFFOLD_ADDED_CHUNKS".to_string(), sorted(&injected)),
            ("SCAFFOLD_SKIPPED_CHUNKS".to_string(), sorted(&skipped)),
            ("SCAFFOLD_FAILED_CHUNKS".to_string(), sorted(&failed)),
        ]
    }
}
