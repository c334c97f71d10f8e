//! Task store access
//!
//! The host task store is an external collaborator. This module provides:
//! - The [`TaskStore`] capability (authorize, enumerate lists, fetch items)
//! - A JSON file backend that works everywhere
//! - An in-memory backend for tests and dry runs
//! - An Apple Reminders backend on macOS

pub mod file;
pub mod memory;
pub mod model;
pub mod reminders;

pub use model::{start_of_tomorrow, Access, FetchPredicate, ListRef, TaskItem, UNTITLED};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Reminder store not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse reminder store: {0}")]
    Parse(String),

    #[error("Reminder store error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Read-only query interface to the host task store.
///
/// Every method is a single blocking request that yields exactly one result.
/// Callers that need to stay responsive run them on a blocking thread.
pub trait TaskStore: Send + Sync {
    /// Ask the user (or the platform) for read access.
    fn request_access(&self) -> Result<Access>;

    /// All lists known to the store.
    fn lists(&self) -> Result<Vec<ListRef>>;

    /// Items matching `predicate`, in the store's native order.
    /// `Ok(None)` means the store produced no result.
    fn fetch_items(&self, predicate: &FetchPredicate) -> Result<Option<Vec<TaskItem>>>;
}

/// Which backend to read reminders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Apple Reminders on macOS, the JSON file store elsewhere
    #[default]
    Auto,
    /// JSON file store
    File,
    /// Apple Reminders (macOS only)
    Reminders,
}

impl Backend {
    /// Resolve `Auto` for the current platform.
    pub fn resolve(self) -> Self {
        match self {
            Backend::Auto => {
                #[cfg(target_os = "macos")]
                {
                    Backend::Reminders
                }

                #[cfg(not(target_os = "macos"))]
                {
                    Backend::File
                }
            }
            other => other,
        }
    }
}

/// Open the store selected by `backend`. `path` is only used by the file backend.
pub fn open(backend: Backend, path: PathBuf) -> Result<Box<dyn TaskStore>> {
    match backend.resolve() {
        Backend::File => Ok(Box::new(file::FileStore::new(path))),
        Backend::Reminders => open_reminders(),
        Backend::Auto => unreachable!("resolve() never returns Auto"),
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "macos")] {
        fn open_reminders() -> Result<Box<dyn TaskStore>> {
            Ok(Box::new(reminders::RemindersStore::new()))
        }
    } else {
        fn open_reminders() -> Result<Box<dyn TaskStore>> {
            Err(StoreError::Backend(
                "the Apple Reminders backend is only available on macOS".to_string(),
            ))
        }
    }
}
