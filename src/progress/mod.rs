//! Persistent progress: the only state that survives between runs.

pub mod persistence;
pub mod types;

pub use persistence::{JsonFileStore, MemoryStore, ProgressStore};
pub use types::PersistentProgress;
