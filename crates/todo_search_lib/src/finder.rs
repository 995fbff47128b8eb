//! Expanding glob patterns into the files we will search.
use glob::MatchOptions;
use snafu::ResultExt;
use std::path::{Path, PathBuf};

use crate::{CurrentDirSnafu, Message, PatternSnafu, Result, WalkSnafu};

/// Options shared by the search pattern and the exclude patterns.
///
/// `*` never crosses a `/`, only `**` does. Hidden files are only matched
/// when the pattern names the leading dot.
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

pub struct FileFinder;

impl FileFinder {
    /// Find every regular file under `cwd` that matches `pattern`, skipping
    /// any whose relative path matches one of `excludes`.
    ///
    /// Paths are returned sorted so repeated runs over the same tree agree.
    pub fn find(cwd: &Path, pattern: &str, excludes: &[String]) -> Result<Vec<PathBuf>> {
        Message::FindingFiles {
            pattern: pattern.to_owned(),
        }
        .send();

        let excludes = excludes
            .iter()
            .map(|exclude| {
                glob::Pattern::new(exclude).context(PatternSnafu {
                    pattern: exclude.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let full_pattern = absolute_pattern(cwd, pattern);
        log::debug!("expanding glob '{full_pattern}'");
        let paths = glob::glob_with(&full_pattern, MATCH_OPTIONS).context(PatternSnafu {
            pattern: pattern.to_owned(),
        })?;

        let mut files = vec![];
        for entry in paths {
            let path = entry.context(WalkSnafu)?;
            if !path.is_file() {
                continue;
            }
            let relative = relativize(cwd, &path);
            if excludes
                .iter()
                .any(|exclude| exclude.matches_path_with(&relative, MATCH_OPTIONS))
            {
                log::trace!("excluding {relative:?}");
                continue;
            }
            files.push(path);
        }

        files.sort();
        Message::FoundFiles { count: files.len() }.send();
        Ok(files)
    }
}

/// Anchor a relative pattern at `cwd`. The directory itself is escaped so
/// that brackets or stars in its name are matched literally.
fn absolute_pattern(cwd: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
        return pattern.to_owned();
    }
    let pattern = pattern.trim_start_matches("./");
    let escaped = glob::Pattern::escape(&cwd.to_string_lossy());
    format!("{}/{}", escaped.trim_end_matches('/'), pattern)
}

/// The process working directory, resolved once by callers and then passed
/// around explicitly.
pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context(CurrentDirSnafu)
}

/// Make `path` relative to `cwd`. Paths outside of `cwd` are returned as-is.
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use todo_search_lib::finder::relativize;
///
/// assert_eq!(
///     relativize(Path::new("/work"), Path::new("/work/src/main.rs")),
///     PathBuf::from("src/main.rs")
/// );
/// assert_eq!(
///     relativize(Path::new("/work"), Path::new("/elsewhere/lib.rs")),
///     PathBuf::from("/elsewhere/lib.rs")
/// );
/// ```
pub fn relativize(cwd: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(cwd).unwrap_or(path).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::write(root.join("top.js"), "// TODO: top\n").unwrap();
        fs::write(root.join("src/a.js"), "// TODO: a\n").unwrap();
        fs::write(root.join("src/b.rs"), "// TODO: b\n").unwrap();
        fs::write(root.join("src/nested/c.js"), "// TODO: c\n").unwrap();
        fs::write(root.join(".hidden.js"), "// TODO: hidden\n").unwrap();
        dir
    }

    fn relative(cwd: &Path, files: Vec<PathBuf>) -> Vec<String> {
        files
            .into_iter()
            .map(|f| relativize(cwd, &f).display().to_string())
            .collect()
    }

    #[test]
    fn finds_nested_files() {
        let dir = tree();
        let files = FileFinder::find(dir.path(), "**/*.js", &[]).unwrap();
        assert_eq!(
            relative(dir.path(), files),
            vec!["src/a.js", "src/nested/c.js", "top.js"]
        );
    }

    #[test]
    fn skips_directories_and_hidden_files() {
        let dir = tree();
        let files = FileFinder::find(dir.path(), "*", &[]).unwrap();
        assert_eq!(relative(dir.path(), files), vec!["top.js"]);
    }

    #[test]
    fn no_matches_is_not_an_error() {
        let dir = tree();
        let files = FileFinder::find(dir.path(), "**/*.py", &[]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn excludes_relative_paths() {
        let dir = tree();
        let files = FileFinder::find(dir.path(), "**/*.js", &["src/nested/*".into()]).unwrap();
        assert_eq!(relative(dir.path(), files), vec!["src/a.js", "top.js"]);
    }

    #[test]
    fn excludes_treat_separators_like_the_search_pattern() {
        let dir = tree();
        let found = FileFinder::find(dir.path(), "src/*", &[]).unwrap();
        assert_eq!(relative(dir.path(), found), vec!["src/a.js", "src/b.rs"]);

        let files = FileFinder::find(dir.path(), "**/*.js", &["src/*".into()]).unwrap();
        assert_eq!(relative(dir.path(), files), vec!["src/nested/c.js", "top.js"]);

        let files = FileFinder::find(dir.path(), "**/*.js", &["src/**".into()]).unwrap();
        assert_eq!(relative(dir.path(), files), vec!["top.js"]);
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let dir = tree();
        let err = FileFinder::find(dir.path(), "src/***", &[]).unwrap_err();
        assert!(matches!(err, crate::Error::Pattern { .. }), "{err}");

        let err = FileFinder::find(dir.path(), "*.js", &["[".into()]).unwrap_err();
        assert!(matches!(err, crate::Error::Pattern { .. }), "{err}");
    }

    #[test]
    fn escapes_the_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().join("weird[dir]");
        fs::create_dir_all(&cwd).unwrap();
        fs::write(cwd.join("x.js"), "// TODO: x\n").unwrap();
        let files = FileFinder::find(&cwd, "*.js", &[]).unwrap();
        assert_eq!(relative(&cwd, files), vec!["x.js"]);
    }
}
