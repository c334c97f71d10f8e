//! Report file naming and atomic writes

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use tracing::{debug, warn};

use crate::error::{ExportError, Result};

const FILE_PREFIX: &str = "today_reminders_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `today_reminders_YYYYMMDD_HHMMSS.md` for the given local time.
pub fn report_filename<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}{}.md", FILE_PREFIX, at.format(TIMESTAMP_FORMAT))
}

/// Write `content` to `dir/filename` so the target is either absent or complete.
///
/// The content goes to a temp file in `dir` first, is synced, then renamed
/// over the target. On any failure the temp file is removed.
pub fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let target = dir.join(filename);
    let failed = |source: std::io::Error| ExportError::WriteFailed {
        path: target.clone(),
        source,
    };

    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir).map_err(failed)?;
    }

    let temp_dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".today_reminders_")
        .suffix(".tmp")
        .tempfile_in(temp_dir)
        .map_err(failed)?;

    debug!(temp = %temp.path().display(), "Writing report to temp file");

    temp.write_all(content.as_bytes()).map_err(failed)?;
    temp.as_file().sync_all().map_err(failed)?;

    temp.persist(&target).map_err(|e| {
        warn!(target = %target.display(), "Failed to move report into place: {}", e.error);
        failed(e.error)
    })?;

    Ok(target)
}
