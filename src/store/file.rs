//! JSON file reminder store
//!
//! Layout:
//!
//! ```json
//! {"lists": [{"id": "home", "title": "Home", "items": [
//!     {"title": "Buy milk", "due": "2026-02-15T09:00:00", "completed": false}
//! ]}]}
//! ```
//!
//! `due` may also be a bare date (`2026-02-15`), read as local midnight.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::{Access, FetchPredicate, ListRef, Result, StoreError, TaskItem, TaskStore};

pub const DEFAULT_STORE_FILE: &str = "reminders.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFile {
    #[serde(default)]
    pub lists: Vec<StoredList>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredList {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<StoredItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredItem {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, with = "due_format")]
    pub due: Option<NaiveDateTime>,

    #[serde(default)]
    pub completed: bool,
}

impl StoredItem {
    pub fn new(title: Option<&str>, due: Option<NaiveDateTime>, completed: bool) -> Self {
        Self {
            title: title.map(str::to_string),
            due,
            completed,
        }
    }
}

impl StoreFile {
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(content).map_err(|e| StoreError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Parse(e.to_string()))
    }
}

mod due_format {
    use super::*;

    const DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S";
    const DATE: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(
        due: &Option<NaiveDateTime>,
        s: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match due {
            Some(due) => s.serialize_str(&due.format(DATE_TIME).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }

    pub(super) fn parse(s: &str) -> std::result::Result<NaiveDateTime, String> {
        let s = s.trim();
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, DATE_TIME) {
            return Ok(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
            return Ok(dt);
        }
        NaiveDate::parse_from_str(s, DATE)
            .map(|d| d.and_time(NaiveTime::MIN))
            .map_err(|_| format!("invalid due date '{}', expected YYYY-MM-DD[THH:MM[:SS]]", s))
    }
}

/// Parse a due date in the store's format (date-time or bare date).
pub fn parse_due(s: &str) -> std::result::Result<NaiveDateTime, String> {
    due_format::parse(s)
}

/// Reads reminders from a JSON file. The file is re-read on every call so each
/// request sees the store as it is at that moment.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<StoreFile> {
        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => StoreError::Io(e),
        })?;
        StoreFile::parse(&content)
    }
}

impl TaskStore for FileStore {
    fn request_access(&self) -> Result<Access> {
        match File::open(&self.path) {
            Ok(_) => Ok(Access::Granted),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Ok(Access::Denied(Some(format!("{}: {}", self.path.display(), e))))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(self.path.clone()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn lists(&self) -> Result<Vec<ListRef>> {
        let file = self.load()?;
        Ok(file
            .lists
            .iter()
            .map(|l| ListRef::new(l.id.clone(), l.title.clone()))
            .collect())
    }

    fn fetch_items(&self, predicate: &FetchPredicate) -> Result<Option<Vec<TaskItem>>> {
        let file = self.load()?;
        let items: Vec<TaskItem> = file
            .lists
            .into_iter()
            .filter(|l| predicate.includes_list(&l.id))
            .flat_map(|list| {
                let list_name = list.title;
                list.items.into_iter().map(move |item| TaskItem {
                    title: item.title,
                    due_date: item.due,
                    completed: item.completed,
                    list_name: list_name.clone(),
                })
            })
            .filter(|item| predicate.matches(item))
            .collect();

        debug!(
            path = %self.path.display(),
            matched = items.len(),
            "Fetched reminders from file store"
        );
        Ok(Some(items))
    }
}
