//! [`StaticFetcher`]: canned source contents keyed by source description.

use std::cell::RefCell;
use std::collections::HashMap;

use scaffold_inject::{Error, Result, Source, SourceFetcher};

/// Serves fixed content per source and records every fetch.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    contents: HashMap<String, String>,
    fetched: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register content for a source, keyed by its description (path, URL,
    /// command or script text).
    pub fn with(mut self, source: &str, content: &str) -> Self {
        self.contents.insert(source.to_string(), content.to_string());
        self
    }

    /// Sources fetched so far, in order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl SourceFetcher for StaticFetcher {
    fn fetch(&self, source: &Source) -> Result<String> {
        let key = source.describe().to_string();
        self.fetched.borrow_mut().push(key.clone());
        self.contents
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::fetch(key.clone(), format!("{} does not exist", key)))
    }
}
