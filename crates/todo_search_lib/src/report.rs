//! Rendering search results for people and for programs.
use console::Style;
use snafu::ResultExt;

use crate::{marker::clean_line, FileResult, JsonSnafu, Result};

/// Styles applied to the parts of a text report.
pub struct Palette {
    pub file_name: Style,
    pub text: Style,
    pub line_number: Style,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            file_name: Style::new().blue(),
            text: Style::new().yellow(),
            line_number: Style::new().dim(),
        }
    }
}

impl Palette {
    /// A palette that adds no escape codes at all.
    pub fn plain() -> Self {
        Palette {
            file_name: Style::new(),
            text: Style::new(),
            line_number: Style::new(),
        }
    }
}

/// Render each file name on its own line followed by its matches, one per
/// line, with the marker stripped and the line number in parentheses.
///
/// ```rust
/// use todo_search_lib::{report::{render_text, Palette}, searcher::search_text};
///
/// let result = search_text("TODO", "a.js", "// TODO: fix this\nlet x = 1\n").unwrap();
/// assert_eq!(
///     render_text(&[result], "TODO", &Palette::plain()),
///     "a.js\n  - fix this (1)\n"
/// );
/// ```
pub fn render_text(results: &[FileResult], keyword: &str, palette: &Palette) -> String {
    let mut lines = vec![];
    for result in results {
        lines.push(format!(
            "{}",
            palette.file_name.apply_to(result.file_name().display())
        ));
        for found in result.matches() {
            lines.push(format!(
                "  {} {} {}",
                palette.text.apply_to("-"),
                palette.text.apply_to(clean_line(keyword, &found.text)),
                palette
                    .line_number
                    .apply_to(format!("({})", found.line_number)),
            ));
        }
    }

    lines
        .into_iter()
        .map(|line| line + "\n")
        .collect::<String>()
}

/// Render the results as a pretty printed JSON array.
pub fn render_json(results: &[FileResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context(JsonSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::search_text;

    #[test]
    fn renders_grouped_matches() {
        let results = vec![
            search_text(
                "TODO",
                "a.js",
                "// TODO: fix this\nlet x = 1\n// TODO: and this too",
            )
            .unwrap(),
            search_text("TODO", "src/b.py", "# TODO(ana): later\n").unwrap(),
        ];
        let text = render_text(&results, "TODO", &Palette::plain());
        assert_eq!(
            text,
            "a.js\n  - fix this (1)\n  - and this too (3)\nsrc/b.py\n  - later (1)\n"
        );
    }

    #[test]
    fn renders_nothing_for_no_results() {
        assert_eq!(render_text(&[], "TODO", &Palette::plain()), "");
        assert_eq!(render_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn renders_json() {
        let results = vec![search_text("FIXME", "a.rs", "x\n// FIXME: y").unwrap()];
        let json: serde_json::Value = serde_json::from_str(&render_json(&results).unwrap()).unwrap();
        assert_eq!(json[0]["fileName"], "a.rs");
        assert_eq!(json[0]["count"], 1);
        assert_eq!(json[0]["matches"][0]["lineNumber"], 2);
        assert_eq!(json[0]["matches"][0]["text"], "// FIXME: y");
    }
}
