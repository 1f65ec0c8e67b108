//! Injection classifier: which of the four conditions a target is in, and
//! whether a chunk is permitted to act on it.

use std::fmt;
use std::ops::Range;

use scaffold_fs::TargetState;

use crate::chunk::{Condition, Conditions};
use crate::pattern::{PatternMatch, PatternMatcher};

/// A classified target, carrying the span to substitute where relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetCondition {
    NoFile,
    NoPattern,
    /// Span of the single delimiter occurrence
    SinglePattern(Range<usize>),
    /// Span from the first delimiter through the last one
    DoublePattern(Range<usize>),
}

impl TargetCondition {
    pub fn condition(&self) -> Condition {
        match self {
            Self::NoFile => Condition::NoFile,
            Self::NoPattern => Condition::NoPattern,
            Self::SinglePattern(_) => Condition::SinglePattern,
            Self::DoublePattern(_) => Condition::DoublePattern,
        }
    }
}

/// Why a chunk was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The target's condition is outside the chunk's allow-list, or it is a
    /// double pattern and the caller did not grant force
    ConditionNotAllowed {
        condition: Condition,
        needs_force: bool,
    },
    /// The target existed before scaffolding and was not freshly written
    TargetNotFresh,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConditionNotAllowed {
                condition,
                needs_force: true,
            } => write!(f, "condition-not-allowed ({} requires force)", condition),
            Self::ConditionNotAllowed { condition, .. } => {
                write!(f, "condition-not-allowed ({})", condition)
            }
            Self::TargetNotFresh => f.write_str("target-not-fresh"),
        }
    }
}

/// Classify a target from its state alone.
pub fn classify(target: &TargetState, matcher: &PatternMatcher) -> TargetCondition {
    if !target.exists {
        return TargetCondition::NoFile;
    }
    match matcher.find(&target.content) {
        PatternMatch::None => TargetCondition::NoPattern,
        PatternMatch::Single(span) => TargetCondition::SinglePattern(span),
        PatternMatch::Double(span) => TargetCondition::DoublePattern(span),
    }
}

/// Check a classified target against the allow-list.
///
/// A double pattern marks a previously injected region, so it additionally
/// requires `force` even when the allow-list contains it.
pub fn admit(
    target: &TargetCondition,
    allowed: &Conditions,
    force: bool,
) -> Result<(), SkipReason> {
    let condition = target.condition();
    let permitted = allowed.contains(condition);

    match target {
        TargetCondition::DoublePattern(_) if permitted && !force => {
            Err(SkipReason::ConditionNotAllowed {
                condition,
                needs_force: true,
            })
        }
        TargetCondition::NoFile
        | TargetCondition::NoPattern
        | TargetCondition::SinglePattern(_)
        | TargetCondition::DoublePattern(_) => {
            if permitted {
                Ok(())
            } else {
                Err(SkipReason::ConditionNotAllowed {
                    condition,
                    needs_force: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PATTERN: &str = "<!-- id -->";

    fn classify_text(state: TargetState) -> TargetCondition {
        classify(&state, &PatternMatcher::new("id", PATTERN).unwrap())
    }

    #[rstest]
    #[case(TargetState::absent(), Condition::NoFile)]
    #[case(TargetState::present(""), Condition::NoPattern)]
    #[case(TargetState::present("plain"), Condition::NoPattern)]
    #[case(TargetState::present("A <!-- id --> B"), Condition::SinglePattern)]
    #[case(TargetState::present("<!-- id -->x<!-- id -->"), Condition::DoublePattern)]
    #[case(TargetState::present("<!-- id --><!-- id --><!-- id -->"), Condition::DoublePattern)]
    fn test_classify(#[case] state: TargetState, #[case] expected: Condition) {
        assert_eq!(classify_text(state).condition(), expected);
    }

    #[rstest]
    #[case(TargetCondition::NoFile, false, true)]
    #[case(TargetCondition::NoPattern, false, true)]
    #[case(TargetCondition::SinglePattern(0..1), false, true)]
    #[case(TargetCondition::DoublePattern(0..2), false, false)]
    #[case(TargetCondition::DoublePattern(0..2), true, true)]
    fn test_admit_with_full_allow_list(
        #[case] target: TargetCondition,
        #[case] force: bool,
        #[case] admitted: bool,
    ) {
        assert_eq!(admit(&target, &Conditions::all(), force).is_ok(), admitted);
    }

    #[test]
    fn test_double_without_force_reports_force_needed() {
        let reason = admit(&TargetCondition::DoublePattern(0..2), &Conditions::all(), false)
            .unwrap_err();
        assert_eq!(
            reason,
            SkipReason::ConditionNotAllowed {
                condition: Condition::DoublePattern,
                needs_force: true,
            }
        );
        assert_eq!(
            reason.to_string(),
            "condition-not-allowed (double-pattern requires force)"
        );
    }

    #[test]
    fn test_force_does_not_override_allow_list() {
        let allowed = Conditions::except([Condition::DoublePattern]);
        let reason = admit(&TargetCondition::DoublePattern(0..2), &allowed, true).unwrap_err();
        assert_eq!(reason.to_string(), "condition-not-allowed (double-pattern)");
    }

    #[test]
    fn test_no_file_excluded() {
        let allowed = Conditions::only([
            Condition::NoPattern,
            Condition::SinglePattern,
            Condition::DoublePattern,
        ]);
        assert!(admit(&TargetCondition::NoFile, &allowed, true).is_err());
    }
}
