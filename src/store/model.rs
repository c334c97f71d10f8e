//! Reminder data model

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Title used for items that have none.
pub const UNTITLED: &str = "Untitled";

/// A reference to one list (calendar) in the task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRef {
    /// Store-specific list identifier
    pub id: String,

    /// Display title of the list
    pub title: String,
}

impl ListRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A reminder as returned by the task store. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    /// Reminder title, absent for untitled reminders
    #[serde(default)]
    pub title: Option<String>,

    /// Due date in local wall-clock time
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,

    /// Whether the reminder is marked done
    #[serde(default)]
    pub completed: bool,

    /// Title of the list this reminder belongs to
    pub list_name: String,
}

impl TaskItem {
    pub fn new(title: Option<&str>, due_date: Option<NaiveDateTime>, completed: bool) -> Self {
        Self {
            title: title.map(str::to_string),
            due_date,
            completed,
            list_name: String::new(),
        }
    }

    pub fn in_list(mut self, list_name: impl Into<String>) -> Self {
        self.list_name = list_name.into();
        self
    }

    /// The title to show in the report. Missing and blank titles become "Untitled".
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => UNTITLED,
        }
    }
}

/// Outcome of an authorization prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Denied, optionally with the store's explanation
    Denied(Option<String>),
}

/// The "Today" smart list: incomplete reminders due before `due_before`
/// (or with no due date) in any of `lists`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPredicate {
    /// Exclusive upper bound on the due date
    pub due_before: NaiveDateTime,

    /// Lists in scope
    pub lists: Vec<ListRef>,
}

impl FetchPredicate {
    /// Predicate for everything due today or earlier relative to `today`.
    pub fn due_today(today: NaiveDate, lists: Vec<ListRef>) -> Self {
        Self {
            due_before: start_of_tomorrow(today),
            lists,
        }
    }

    /// Completion and due-date test. List scope is applied by the store,
    /// which only reads lists for which `includes_list` holds.
    pub fn matches(&self, item: &TaskItem) -> bool {
        if item.completed {
            return false;
        }
        match item.due_date {
            Some(due) => due < self.due_before,
            None => true,
        }
    }

    pub fn includes_list(&self, list_id: &str) -> bool {
        self.lists.iter().any(|l| l.id == list_id)
    }
}

/// Local midnight at the start of the day after `today`.
pub fn start_of_tomorrow(today: NaiveDate) -> NaiveDateTime {
    (today + Duration::days(1)).and_time(NaiveTime::MIN)
}
