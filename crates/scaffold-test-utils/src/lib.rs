//! Shared test utilities for the scaffolder workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`project`]: [`TestProject`] temp-directory builder
//! - [`fetcher`]: [`StaticFetcher`] canned source contents

pub mod fetcher;
pub mod project;

pub use fetcher::StaticFetcher;
pub use project::TestProject;

/// Template body used across injection tests; contains a single
/// `<!-- project_name -->` marker and a `## Options` heading.
pub const TEMPLATE_CONTENT: &str = "# {{project_name}}
Welcome to <!-- project_name -->

## Options
{{options}}

## CI
{{ci}}

## Support
[Get Support]({{support_url}})";
