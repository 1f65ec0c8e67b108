//! Filesystem layer for the scaffolder
//!
//! Provides project-relative path handling and the read/write primitives the
//! injection engine uses to observe and update target files.

pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use io::{TargetState, read_target, read_text, write_atomic, write_text};
pub use path::NormalizedPath;
