//! Keyword list loading
//!
//! The keyword source is a plain text file with one keyword per line.
//! Lines are trimmed and blank lines are ignored. A missing or empty file
//! halts the run before any output is produced.

use crate::ConfigError;
use std::path::Path;

/// Reads the keyword list from a plain text file
///
/// # Arguments
///
/// * `path` - Path to the keyword file
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The non-empty, trimmed keywords in file order
/// * `Err(ConfigError)` - File unreadable, or no keywords after trimming
pub fn read_keywords(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| ConfigError::KeywordsUnreadable(path.display().to_string()))?;

    let keywords: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if keywords.is_empty() {
        return Err(ConfigError::NoKeywords(path.display().to_string()));
    }

    Ok(keywords)
}
