//! Fanning the line searcher out over every file a pattern matches.
use std::path::{Path, PathBuf};

use crate::{finder::FileFinder, searcher, Error, FileResult, Marker, Message, Result};

/// What to do when some of the matched files can't be read.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any unreadable file fails the whole search.
    #[default]
    FailFast,
    /// Report unreadable files next to the results of the readable ones.
    KeepGoing,
}

/// The inputs of one search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: String,
    pub pattern: String,
    pub excludes: Vec<String>,
    pub policy: FailurePolicy,
}

impl SearchRequest {
    pub fn new(keyword: impl Into<String>, pattern: impl Into<String>) -> Self {
        SearchRequest {
            keyword: keyword.into(),
            pattern: pattern.into(),
            excludes: vec![],
            policy: FailurePolicy::default(),
        }
    }

    pub fn for_marker(marker: Marker, pattern: impl Into<String>) -> Self {
        Self::new(marker.keyword(), pattern)
    }

    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// A file that matched the pattern but could not be searched.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// The outcome of a search.
///
/// `failures` is only ever populated under [`FailurePolicy::KeepGoing`].
#[derive(Debug, Default)]
pub struct SearchReport {
    pub results: Vec<FileResult>,
    pub failures: Vec<FileFailure>,
}

impl SearchReport {
    /// Number of matched lines across all files.
    pub fn total_matches(&self) -> usize {
        self.results.iter().map(FileResult::count).sum()
    }
}

/// Search every file under `cwd` matching the request's pattern.
///
/// All reads are started together and awaited together; none is abandoned
/// early, even under [`FailurePolicy::FailFast`]. Results keep the order the
/// files were found in and files without matches are left out.
pub async fn search_files(request: &SearchRequest, cwd: &Path) -> Result<SearchReport> {
    let files = FileFinder::find(cwd, &request.pattern, &request.excludes)?;
    log::debug!(
        "searching {} files for '{}'",
        files.len(),
        request.keyword
    );

    let searches = files
        .iter()
        .map(|path| searcher::search_file(&request.keyword, path, cwd));
    let outcomes = futures::future::join_all(searches).await;

    let mut report = SearchReport::default();
    for (path, outcome) in files.into_iter().zip(outcomes) {
        match outcome {
            Ok(Some(result)) => report.results.push(result),
            Ok(None) => {}
            Err(error) => match request.policy {
                FailurePolicy::FailFast => return Err(error),
                FailurePolicy::KeepGoing => {
                    log::warn!("skipping {path:?}: {error}");
                    report.failures.push(FileFailure { path, error });
                }
            },
        }
    }

    Message::FoundMatches {
        files: report.results.len(),
        total: report.total_matches(),
    }
    .send();
    Ok(report)
}
