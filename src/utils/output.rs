use std::path::Path;

use serde::Serialize;

use crate::error::scrape::{ErrorKind, ScrapeError};

/// Writes `value` as 2-space indented JSON, creating parent folders as needed.
/// Non-ASCII text is written as-is.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|err| ScrapeError::wrap(ErrorKind::Output, err))?;
        }
    }

    let json = serde_json::to_string_pretty(value)
        .map_err(|err| ScrapeError::wrap(ErrorKind::Output, err))?;
    std::fs::write(path, json).map_err(|err| ScrapeError::wrap(ErrorKind::Output, err))?;
    Ok(())
}
