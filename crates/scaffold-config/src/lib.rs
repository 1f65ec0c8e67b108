//! Template configuration for the scaffolder
//!
//! Loads the template's configuration document and turns its `inject:`
//! entries into validated [`ChunkSpec`](scaffold_inject::ChunkSpec)s for the
//! injection engine.
//!
//! ```yaml
//! ignore:
//!   - docs/
//! replace_pattern: "{{%s}}"
//! inject:
//!   - id: support
//!     target: [README.md, docs/index.md]
//!     file: docs/support.md
//!     before: "## License"
//!     ifnot: double-pattern
//! ```

pub mod config;
pub mod error;
pub mod resolve;
pub mod store;

pub use config::{CommandValue, OneOrMany, RawChunk, RawWrap, TemplateConfig};
pub use error::{Error, Result};
pub use resolve::{ChunkResolver, replacements};
pub use store::ConfigStore;
