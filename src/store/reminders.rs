//! Apple Reminders backend
//!
//! Talks to Reminders.app through `osascript` running JavaScript for
//! Automation. The first request triggers the system permission prompt;
//! a refusal surfaces as AppleEvent error -1743.
//!
//! Decoding of the script output builds everywhere; [`RemindersStore`]
//! itself only exists on macOS.

use serde::Deserialize;
use tracing::debug;

use super::file::parse_due;
use super::{FetchPredicate, ListRef, Result, StoreError, TaskItem};

const NOT_AUTHORIZED: &str = "-1743";

#[derive(Debug, Deserialize)]
struct ScriptList {
    id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ScriptItem {
    title: Option<String>,
    due: Option<String>,
    completed: bool,
    list: String,
}

/// Whether `osascript` stderr reports a missing automation permission.
pub fn is_not_authorized(stderr: &str) -> bool {
    stderr.contains(NOT_AUTHORIZED) || stderr.contains("Not authorized")
}

/// Decode the JSON printed by the list script.
pub fn parse_lists(stdout: &str) -> Result<Vec<ListRef>> {
    let lists: Vec<ScriptList> =
        serde_json::from_str(stdout).map_err(|e| StoreError::Parse(e.to_string()))?;
    Ok(lists
        .into_iter()
        .map(|l| ListRef::new(l.id, l.title))
        .collect())
}

/// Decode the JSON printed by the item script and keep what `predicate`
/// matches. Empty output means the script produced no result.
pub fn parse_items(stdout: &str, predicate: &FetchPredicate) -> Result<Option<Vec<TaskItem>>> {
    if stdout.is_empty() {
        return Ok(None);
    }

    let raw: Vec<ScriptItem> =
        serde_json::from_str(stdout).map_err(|e| StoreError::Parse(e.to_string()))?;

    let mut items = Vec::with_capacity(raw.len());
    for item in raw {
        let due_date = item
            .due
            .as_deref()
            .map(parse_due)
            .transpose()
            .map_err(StoreError::Parse)?;
        let item = TaskItem {
            title: item.title,
            due_date,
            completed: item.completed,
            list_name: item.list,
        };
        if predicate.matches(&item) {
            items.push(item);
        }
    }

    debug!(matched = items.len(), "Fetched reminders from Reminders.app");
    Ok(Some(items))
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "macos")] {
        use std::process::Command;

        use super::{Access, TaskStore};

        const ACCESS_SCRIPT: &str = r#"
        function run() {
            return String(Application('Reminders').lists.length);
        }
        "#;

        const LISTS_SCRIPT: &str = r#"
        function run() {
            const app = Application('Reminders');
            return JSON.stringify(app.lists().map(l => ({ id: l.id(), title: l.name() })));
        }
        "#;

        const ITEMS_SCRIPT: &str = r#"
        function pad(n) { return (n < 10 ? '0' : '') + n; }
        function local(d) {
            if (!d) { return null; }
            return d.getFullYear() + '-' + pad(d.getMonth() + 1) + '-' + pad(d.getDate()) +
                'T' + pad(d.getHours()) + ':' + pad(d.getMinutes()) + ':' + pad(d.getSeconds());
        }
        function run(argv) {
            const app = Application('Reminders');
            const out = [];
            argv.forEach(id => {
                const list = app.lists.byId(id);
                const listName = list.name();
                const pending = list.reminders.whose({ completed: false });
                const names = pending.name();
                const dues = pending.dueDate();
                for (let i = 0; i < names.length; i++) {
                    out.push({ title: names[i], due: local(dues[i]), completed: false, list: listName });
                }
            });
            return JSON.stringify(out);
        }
        "#;

        enum ScriptOutcome {
            Ok(String),
            NotAuthorized(String),
        }

        pub struct RemindersStore;

        impl RemindersStore {
            pub fn new() -> Self {
                Self
            }

            fn run_script(&self, script: &str, args: &[&str]) -> Result<ScriptOutcome> {
                let output = Command::new("osascript")
                    .args(["-l", "JavaScript", "-e", script])
                    .args(args)
                    .output()?;

                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                if !output.status.success() {
                    debug!(status = ?output.status, %stderr, "osascript failed");
                    if is_not_authorized(&stderr) {
                        return Ok(ScriptOutcome::NotAuthorized(stderr));
                    }
                    return Err(StoreError::Backend(stderr));
                }

                Ok(ScriptOutcome::Ok(
                    String::from_utf8_lossy(&output.stdout).trim().to_string(),
                ))
            }

            fn run_authorized(&self, script: &str, args: &[&str]) -> Result<String> {
                match self.run_script(script, args)? {
                    ScriptOutcome::Ok(stdout) => Ok(stdout),
                    ScriptOutcome::NotAuthorized(msg) => Err(StoreError::PermissionDenied(msg)),
                }
            }
        }

        impl Default for RemindersStore {
            fn default() -> Self {
                Self::new()
            }
        }

        impl TaskStore for RemindersStore {
            fn request_access(&self) -> Result<Access> {
                match self.run_script(ACCESS_SCRIPT, &[])? {
                    ScriptOutcome::Ok(_) => Ok(Access::Granted),
                    ScriptOutcome::NotAuthorized(msg) => Ok(Access::Denied(Some(msg))),
                }
            }

            fn lists(&self) -> Result<Vec<ListRef>> {
                let stdout = self.run_authorized(LISTS_SCRIPT, &[])?;
                parse_lists(&stdout)
            }

            fn fetch_items(&self, predicate: &FetchPredicate) -> Result<Option<Vec<TaskItem>>> {
                let ids: Vec<&str> = predicate.lists.iter().map(|l| l.id.as_str()).collect();
                let stdout = self.run_authorized(ITEMS_SCRIPT, &ids)?;
                parse_items(&stdout, predicate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn predicate() -> FetchPredicate {
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        FetchPredicate::due_today(today, vec![ListRef::new("x-apple-1", "Inbox")])
    }

    #[test]
    fn test_not_authorized_detection() {
        assert!(is_not_authorized(
            "execution error: Error: Not authorized to send Apple events to Reminders. (-1743)"
        ));
        assert!(is_not_authorized("osascript: Error -1743"));
        assert!(!is_not_authorized(
            "execution error: Error: Application isn't running. (-600)"
        ));
        assert!(!is_not_authorized(""));
    }

    #[test]
    fn test_parse_lists() {
        let lists = parse_lists(
            r#"[{"id":"x-apple-1","title":"Inbox"},{"id":"x-apple-2","title":"Work"}]"#,
        )
        .unwrap();
        assert_eq!(
            lists,
            vec![
                ListRef::new("x-apple-1", "Inbox"),
                ListRef::new("x-apple-2", "Work")
            ]
        );
    }

    #[test]
    fn test_parse_lists_rejects_garbage() {
        assert!(matches!(parse_lists("not json"), Err(StoreError::Parse(_))));
    }

    #[test]
    fn test_parse_items_applies_predicate() {
        let stdout = r#"[
            {"title":"Buy milk","due":"2026-03-14T09:00:00","completed":false,"list":"Inbox"},
            {"title":"Overdue","due":"2026-03-10T18:30:00","completed":false,"list":"Inbox"},
            {"title":"Tomorrow","due":"2026-03-15T00:00:00","completed":false,"list":"Inbox"},
            {"title":null,"due":null,"completed":false,"list":"Inbox"}
        ]"#;

        let items = parse_items(stdout, &predicate()).unwrap().unwrap();
        let titles: Vec<&str> = items.iter().map(TaskItem::display_title).collect();
        assert_eq!(titles, vec!["Buy milk", "Overdue", "Untitled"]);
        assert_eq!(items[0].list_name, "Inbox");
        assert_eq!(
            items[0].due_date,
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap().and_hms_opt(9, 0, 0)
        );
    }

    #[test]
    fn test_parse_items_empty_output_is_no_result() {
        assert!(parse_items("", &predicate()).unwrap().is_none());
        assert_eq!(parse_items("[]", &predicate()).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_parse_items_bad_due_date() {
        let stdout = r#"[{"title":"x","due":"tomorrow","completed":false,"list":"Inbox"}]"#;
        assert!(matches!(
            parse_items(stdout, &predicate()),
            Err(StoreError::Parse(_))
        ));
    }
}
