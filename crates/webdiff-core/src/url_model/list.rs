//! URL list loading: dedupe raw lines, then keep the ones that parse.

use std::collections::HashSet;
use std::path::Path;

use url::Url;

use crate::error::InputError;

use super::origin::path_of;

/// Result of filtering a raw URL list.
#[derive(Debug, Clone, Default)]
pub struct UrlList {
    /// Parsed URLs in first-seen order.
    pub urls: Vec<Url>,
    /// Non-empty lines that failed to parse, with the parse error.
    pub rejected: Vec<(String, String)>,
}

impl UrlList {
    /// Page paths of the surviving URLs, in order.
    pub fn paths(&self) -> Vec<String> {
        self.urls.iter().map(path_of).collect()
    }
}

/// Removes exact duplicate strings, keeping the first occurrence of each.
pub fn dedupe<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let lines: Vec<&str> = lines.iter().map(|s| s.as_ref()).collect();
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}

/// Splits file content into lines. A trailing `\r` is stripped from each line.
pub fn split_lines(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect()
}

/// Dedupes and validates raw lines. Empty lines are skipped silently; lines
/// that fail to parse end up in [`UrlList::rejected`] and, when `verbose` is
/// set, are also logged as warnings.
pub fn filter_valid<S: AsRef<str>>(lines: &[S], verbose: bool) -> UrlList {
    let mut list = UrlList::default();
    for line in dedupe(lines) {
        if line.is_empty() {
            continue;
        }
        match Url::parse(&line) {
            Ok(url) => list.urls.push(url),
            Err(e) => {
                if verbose {
                    tracing::warn!(url = %line, "removing invalid URL: {e}");
                } else {
                    tracing::debug!(url = %line, "removing invalid URL: {e}");
                }
                list.rejected.push((line, e.to_string()));
            }
        }
    }
    list
}

/// Reads a newline-delimited URL file and returns the valid, unique URLs.
///
/// Fails if the file does not exist or no valid URL survives.
pub fn read_urls(path: &Path, verbose: bool) -> Result<UrlList, InputError> {
    if !path.exists() {
        return Err(InputError::MissingUrlFile {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let list = filter_valid(&split_lines(&content), verbose);
    if list.urls.is_empty() {
        return Err(InputError::NoValidUrls);
    }
    tracing::info!(
        valid = list.urls.len(),
        rejected = list.rejected.len(),
        "loaded urls from {}",
        path.display()
    );
    Ok(list)
}
