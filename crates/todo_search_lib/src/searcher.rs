//! Searching a single file for lines that contain a keyword.
use serde::Serialize;
use snafu::ResultExt;
use std::path::{Path, PathBuf};

use crate::{finder::relativize, Message, ReadSnafu, Result};

/// One line that contained the keyword.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// The raw line, without its line ending.
    pub text: String,
    /// 1-based position of the line in its file.
    pub line_number: usize,
}

/// Every match in one file, in file order.
///
/// Only built by the searcher, and only when there is at least one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    file_name: PathBuf,
    matches: Vec<Match>,
    count: usize,
}

impl FileResult {
    fn new(file_name: PathBuf, matches: Vec<Match>) -> Self {
        FileResult {
            file_name,
            count: matches.len(),
            matches,
        }
    }

    /// The file's path, relative to the working directory.
    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Search `contents` line by line for `keyword`.
///
/// Lines are split on `\n` with an optional preceding `\r`. A trailing line
/// ending does not start another (empty) line. Matching is a case-sensitive
/// substring test.
///
/// ```rust
/// use todo_search_lib::searcher::search_text;
///
/// let contents = "// TODO: fix this\nlet x = 1\n// todo: lowercase\n";
/// let result = search_text("TODO", "a.js", contents).unwrap();
/// assert_eq!(result.count(), 1);
/// assert_eq!(result.matches()[0].line_number, 1);
///
/// assert!(search_text("FIXME", "a.js", contents).is_none());
/// ```
pub fn search_text(
    keyword: &str,
    file_name: impl Into<PathBuf>,
    contents: &str,
) -> Option<FileResult> {
    let matches = contents
        .lines()
        .zip(1..)
        .filter(|(line, _)| line.contains(keyword))
        .map(|(line, line_number)| Match {
            text: line.to_owned(),
            line_number,
        })
        .collect::<Vec<_>>();

    if matches.is_empty() {
        None
    } else {
        Some(FileResult::new(file_name.into(), matches))
    }
}

/// Read the file at `path` and search it for `keyword`.
///
/// The resulting file name is made relative to `cwd`. A file that cannot be
/// read is an error, never an empty result.
pub async fn search_file(keyword: &str, path: &Path, cwd: &Path) -> Result<Option<FileResult>> {
    log::trace!("reading {path:?}");
    let contents = tokio::fs::read_to_string(path)
        .await
        .context(ReadSnafu { path })?;

    let result = search_text(keyword, relativize(cwd, path), &contents);
    Message::SearchedFile {
        path: path.to_path_buf(),
        matches: result.as_ref().map(FileResult::count).unwrap_or_default(),
    }
    .send();
    Ok(result)
}
