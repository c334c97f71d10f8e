use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Fatal outcomes of an export run. None of them are retried.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Access to reminders was denied{}", reason_suffix(.reason))]
    AccessDenied { reason: Option<String> },

    #[error("No reminders found or error occurred: {0}")]
    FetchFailed(String),

    #[error("Failed to write markdown file {}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!("\nError: {}", reason),
        None => String::new(),
    }
}

impl ExportError {
    pub(crate) fn fetch(err: StoreError) -> Self {
        Self::FetchFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_without_reason() {
        let err = ExportError::AccessDenied { reason: None };
        assert_eq!(err.to_string(), "Access to reminders was denied");
    }

    #[test]
    fn test_access_denied_with_reason() {
        let err = ExportError::AccessDenied {
            reason: Some("not authorized".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Access to reminders was denied\nError: not authorized"
        );
    }

    #[test]
    fn test_write_failed_names_path() {
        let err = ExportError::WriteFailed {
            path: PathBuf::from("/tmp/out.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        };
        assert_eq!(err.to_string(), "Failed to write markdown file /tmp/out.md");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("nope"));
    }
}
