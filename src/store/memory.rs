//! In-memory reminder store
//!
//! Holds a fixed set of lists and items. Failure knobs let callers simulate a
//! denied prompt or a failing fetch without a real backend.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Access, FetchPredicate, ListRef, Result, StoreError, TaskItem, TaskStore};

#[derive(Debug, Clone, Default)]
pub enum FetchBehavior {
    /// Filter the held items through the predicate
    #[default]
    Normal,
    /// Report "no result"
    NoResult,
    /// Report an error with this message
    Error(String),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: Vec<(ListRef, Vec<TaskItem>)>,
    access: Option<Access>,
    fetch: FetchBehavior,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a list holding `items`. Each item's `list_name` is set to the list title.
    pub fn with_list(mut self, list: ListRef, items: Vec<TaskItem>) -> Self {
        let items = items
            .into_iter()
            .map(|item| item.in_list(list.title.clone()))
            .collect();
        self.lists.push((list, items));
        self
    }

    pub fn deny_access(mut self, reason: Option<&str>) -> Self {
        self.access = Some(Access::Denied(reason.map(str::to_string)));
        self
    }

    pub fn with_fetch_behavior(mut self, fetch: FetchBehavior) -> Self {
        self.fetch = fetch;
        self
    }

    /// Number of store requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl TaskStore for MemoryStore {
    fn request_access(&self) -> Result<Access> {
        self.record_call();
        Ok(self.access.clone().unwrap_or(Access::Granted))
    }

    fn lists(&self) -> Result<Vec<ListRef>> {
        self.record_call();
        Ok(self.lists.iter().map(|(list, _)| list.clone()).collect())
    }

    fn fetch_items(&self, predicate: &FetchPredicate) -> Result<Option<Vec<TaskItem>>> {
        self.record_call();
        match &self.fetch {
            FetchBehavior::NoResult => Ok(None),
            FetchBehavior::Error(msg) => Err(StoreError::Backend(msg.clone())),
            FetchBehavior::Normal => Ok(Some(
                self.lists
                    .iter()
                    .filter(|(list, _)| predicate.includes_list(&list.id))
                    .flat_map(|(_, items)| items.iter())
                    .filter(|item| predicate.matches(item))
                    .cloned()
                    .collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_memory_store_sets_list_name() -> Result<()> {
        let store = MemoryStore::new().with_list(
            ListRef::new("1", "Groceries"),
            vec![TaskItem::new(Some("Eggs"), None, false)],
        );
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let predicate = FetchPredicate::due_today(today, store.lists()?);
        let items = store.fetch_items(&predicate)?.unwrap();
        assert_eq!(items[0].list_name, "Groceries");
        assert_eq!(store.calls(), 2);
        Ok(())
    }

    #[test]
    fn test_memory_store_knobs() -> Result<()> {
        let store = MemoryStore::new()
            .deny_access(Some("declined"))
            .with_fetch_behavior(FetchBehavior::NoResult);
        assert_eq!(
            store.request_access()?,
            Access::Denied(Some("declined".to_string()))
        );
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(store
            .fetch_items(&FetchPredicate::due_today(today, vec![]))?
            .is_none());
        Ok(())
    }
}
