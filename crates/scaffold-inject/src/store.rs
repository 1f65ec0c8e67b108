//! Target file access used by the applier

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use scaffold_fs::{NormalizedPath, TargetState, io};

use crate::Result;

/// Reads and writes target files on behalf of the engine.
///
/// Targets are project-relative. Implementations must return fresh state on
/// every read so a chunk observes writes made by earlier chunks.
pub trait TargetStore {
    fn read(&self, target: &NormalizedPath) -> Result<TargetState>;

    /// Replace the whole target, creating parent directories as needed
    fn write(&self, target: &NormalizedPath, content: &str) -> Result<()>;
}

/// Targets on disk, resolved under a project root.
#[derive(Debug, Clone)]
pub struct FsTargetStore {
    root: NormalizedPath,
}

impl FsTargetStore {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn resolve(&self, target: &NormalizedPath) -> Result<NormalizedPath> {
        Ok(self.root.resolve_under(target)?)
    }
}

impl TargetStore for FsTargetStore {
    fn read(&self, target: &NormalizedPath) -> Result<TargetState> {
        Ok(io::read_target(&self.resolve(target)?)?)
    }

    fn write(&self, target: &NormalizedPath, content: &str) -> Result<()> {
        Ok(io::write_text(&self.resolve(target)?, content)?)
    }
}

/// In-memory targets, keyed by project-relative path.
#[derive(Debug, Default)]
pub struct MemoryTargetStore {
    files: Mutex<BTreeMap<NormalizedPath, String>>,
}

impl MemoryTargetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, target: impl Into<NormalizedPath>, content: impl Into<String>) -> Self {
        self.insert(target, content);
        self
    }

    pub fn insert(&self, target: impl Into<NormalizedPath>, content: impl Into<String>) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(target.into(), content.into());
    }

    pub fn get(&self, target: impl Into<NormalizedPath>) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&target.into())
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TargetStore for MemoryTargetStore {
    fn read(&self, target: &NormalizedPath) -> Result<TargetState> {
        Ok(self
            .get(target.clone())
            .map(TargetState::present)
            .unwrap_or_else(TargetState::absent))
    }

    fn write(&self, target: &NormalizedPath, content: &str) -> Result<()> {
        self.insert(target.clone(), content);
        Ok(())
    }
}

/// Staged writes layered over another store.
///
/// Reads see staged content first and fall back to the base store; writes
/// only ever reach the staging layer. Preview runs use this so chunks on the
/// same target chain exactly as they would on disk.
pub struct OverlayTargetStore<'a> {
    base: &'a dyn TargetStore,
    staged: MemoryTargetStore,
}

impl<'a> OverlayTargetStore<'a> {
    pub fn new(base: &'a dyn TargetStore) -> Self {
        Self {
            base,
            staged: MemoryTargetStore::new(),
        }
    }

    /// Targets written so far, staged and never persisted
    pub fn staged(&self) -> &MemoryTargetStore {
        &self.staged
    }
}

impl TargetStore for OverlayTargetStore<'_> {
    fn read(&self, target: &NormalizedPath) -> Result<TargetState> {
        match self.staged.get(target.clone()) {
            Some(content) => Ok(TargetState::present(content)),
            None => self.base.read(target),
        }
    }

    fn write(&self, target: &NormalizedPath, content: &str) -> Result<()> {
        self.staged.write(target, content)
    }
}
