//! [`TestProject`] builder for injection scenarios on a real filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory with helpers for setup and assertion.
///
/// ```rust,no_run
/// use scaffold_test_utils::TestProject;
///
/// let project = TestProject::new().with_file("test/test.html", "<p>hi</p>");
/// project.assert_file_content("test/test.html", "<p>hi</p>");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        self.write(relative, content);
        self
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("failed to read {}: {}", relative, e))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    pub fn assert_file_content(&self, relative: &str, expected: &str) {
        assert_eq!(self.read(relative), expected, "content mismatch in {}", relative);
    }

    pub fn assert_missing(&self, relative: &str) {
        assert!(!self.exists(relative), "expected {} to be absent", relative);
    }
}
