//! Today's reminders export
//!
//! The [`Extractor`] walks the store the same way every run:
//! request access, enumerate lists, fetch the "Today" items, keep their titles.
//! Each store request runs on the blocking pool and is awaited once before the
//! next one is issued.

pub mod render;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::store::{Access, FetchPredicate, ListRef, StoreError, TaskItem, TaskStore};

pub use render::{wrap_item, ExportDocument, WrapMode, DEFAULT_WIDTH};
pub use writer::{report_filename, write_atomic};

/// The local calendar day right now.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// What the store returned for one run.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub lists: Vec<ListRef>,
    pub items: Vec<TaskItem>,
}

impl Extraction {
    /// Report titles in store order, with "Untitled" for missing ones.
    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(TaskItem::display_title).collect()
    }

    pub fn render(&self, mode: WrapMode) -> ExportDocument {
        ExportDocument::render(self.titles(), mode)
    }
}

pub struct Extractor {
    store: Arc<dyn TaskStore>,
}

impl Extractor {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Run one store request on the blocking pool and wait for its single result.
    async fn request<T, F>(&self, op: &'static str, f: F) -> std::result::Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn TaskStore) -> std::result::Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        debug!(op, "Store request issued");
        let result = tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| StoreError::Backend(format!("{} did not complete: {}", op, e)))?;
        debug!(op, ok = result.is_ok(), "Store request completed");
        result
    }

    /// Fetch incomplete reminders due before the start of the day after `today`.
    pub async fn extract(&self, today: NaiveDate) -> Result<Extraction> {
        match self.request("request_access", |s| s.request_access()).await {
            Ok(Access::Granted) => {}
            Ok(Access::Denied(reason)) => return Err(ExportError::AccessDenied { reason }),
            Err(e) => {
                return Err(ExportError::AccessDenied {
                    reason: Some(e.to_string()),
                })
            }
        }

        let lists = self
            .request("lists", |s| s.lists())
            .await
            .map_err(ExportError::fetch)?;
        info!(count = lists.len(), "Enumerated reminder lists");

        let predicate = FetchPredicate::due_today(today, lists.clone());
        debug!(due_before = %predicate.due_before, "Fetching today's reminders");

        let items = self
            .request("fetch_items", move |s| s.fetch_items(&predicate))
            .await
            .map_err(ExportError::fetch)?
            .ok_or_else(|| ExportError::FetchFailed("the store returned no result".to_string()))?;
        info!(count = items.len(), "Fetched today's reminders");

        Ok(Extraction { lists, items })
    }
}

/// Render `extraction` and write it to `dir` under a name stamped with `at`.
pub fn write_report(
    extraction: &Extraction,
    mode: WrapMode,
    dir: &Path,
    at: &DateTime<Local>,
) -> Result<PathBuf> {
    let markdown = extraction.render(mode).to_markdown();
    let path = write_atomic(dir, &report_filename(at), &markdown)?;
    info!(path = %path.display(), "Wrote report");
    Ok(path)
}
