//! Durable storage for [`PersistentProgress`].

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::types::PersistentProgress;
use crate::utils::persistence::{read_json, save_path, write_json, PersistenceError};

const PROGRESS_FILE: &str = "progress.json";

/// Where persistent progress lives between sessions.
pub trait ProgressStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistentProgress>, PersistenceError>;
    fn save(&mut self, progress: &PersistentProgress) -> Result<(), PersistenceError>;
}

/// JSON file store, by default `~/.satoshi-dungeon/progress.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self, PersistenceError> {
        Ok(Self::new(save_path(PROGRESS_FILE)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> Result<Option<PersistentProgress>, PersistenceError> {
        read_json(&self.path)
    }

    fn save(&mut self, progress: &PersistentProgress) -> Result<(), PersistenceError> {
        write_json(&self.path, progress)
    }
}

/// In-memory store for tests and throwaway simulations. Can be told to fail
/// to exercise the non-fatal persistence path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<PersistentProgress>,
    pub fail_loads: bool,
    pub fail_saves: bool,
    save_count: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: PersistentProgress) -> Self {
        Self {
            saved: Some(progress),
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Option<&PersistentProgress> {
        self.saved.as_ref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> u32 {
        self.save_count
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<Option<PersistentProgress>, PersistenceError> {
        if self.fail_loads {
            return Err(PersistenceError::Unavailable(
                "memory store load disabled".to_string(),
            ));
        }
        Ok(self.saved.clone())
    }

    fn save(&mut self, progress: &PersistentProgress) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::Unavailable(
                "memory store save disabled".to_string(),
            ));
        }
        self.saved = Some(progress.clone());
        self.save_count += 1;
        Ok(())
    }
}

/// Shared handle, so a caller can keep inspecting a store after handing it
/// to a [`crate::core::Game`].
impl<S: ProgressStore> ProgressStore for Rc<RefCell<S>> {
    fn load(&self) -> Result<Option<PersistentProgress>, PersistenceError> {
        self.borrow().load()
    }

    fn save(&mut self, progress: &PersistentProgress) -> Result<(), PersistenceError> {
        self.borrow_mut().save(progress)
    }
}
