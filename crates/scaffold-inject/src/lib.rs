//! Marker-delimited content injection for scaffolded projects.
//!
//! A [`ChunkSpec`] says: take content from a [`Source`], and merge it into a
//! target file between two occurrences of a delimiter (`<!-- {id} -->` by
//! default). Each apply classifies the target into one of four conditions:
//!
//! ```text
//! no-file          target absent            -> file becomes the wrapped content
//! no-pattern       delimiter absent         -> insert at anchor, or append
//! single-pattern   delimiter once           -> delimiter replaced by wrapped content
//! double-pattern   delimiter two+ times     -> first..last region replaced (force only)
//! ```
//!
//! Re-running the same chunk without force is a no-op: the first run leaves
//! a double pattern behind, and double patterns need force.
//!
//! The engine talks to the outside world through two seams: a
//! [`TargetStore`] for reading and writing targets and a [`SourceFetcher`]
//! for resolving sources. [`BatchRunner`] applies chunks in order and
//! collects an [`InjectReport`].

pub mod anchor;
pub mod apply;
pub mod batch;
pub mod chunk;
pub mod condition;
pub mod error;
pub mod logging;
pub mod pattern;
pub mod preview;
pub mod replace;
pub mod report;
pub mod source;
pub mod store;
pub mod wrap;

pub use apply::{ApplyOptions, ApplyOutcome, ChunkApplier, Outcome, Plan, plan_injection};
pub use batch::{BatchOptions, BatchRunner};
pub use chunk::{Anchor, ChunkSpec, Condition, Conditions, Source, Wrap, default_pattern};
pub use condition::{SkipReason, TargetCondition};
pub use error::{Error, Result};
pub use pattern::{PatternMatch, PatternMatcher};
pub use replace::{DEFAULT_PLACEHOLDER_FORMAT, Replacements};
pub use report::{ChunkLog, InjectReport};
pub use source::{ProjectSourceFetcher, SourceFetcher};
pub use store::{FsTargetStore, MemoryTargetStore, OverlayTargetStore, TargetStore};
