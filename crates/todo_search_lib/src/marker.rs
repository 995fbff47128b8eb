//! # Marker keywords and cleaning up the lines that contain them.
use nom::{
    bytes::complete as bytes, character::complete as character, combinator, IResult, Parser,
};
use std::fmt;

/// The markers the command line knows about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    Todo,
    Fixme,
}

impl Marker {
    /// The literal substring searched for.
    pub fn keyword(&self) -> &'static str {
        match self {
            Marker::Todo => "TODO",
            Marker::Fixme => "FIXME",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Comment openers that may directly precede a marker, longest first.
pub const COMMENT_OPENERS: &[&str] = &[
    "<!--", "///", "//!", "/**", "//", "/*", "{-", "--", "#", ";", "*",
];

/// Comment closers that may end a marker line.
pub const COMMENT_CLOSERS: &[&str] = &["*/", "-->", "-}"];

/// Eat an assigned name.
///
/// ```rust
/// use todo_search_lib::marker::assignee;
///
/// assert_eq!(assignee("(mitchellwrosen)"), Ok(("", "mitchellwrosen")))
/// ```
pub fn assignee(i: &str) -> IResult<&str, &str> {
    let (i, _) = character::char('(')(i)?;
    let (i, _) = character::space0(i)?;
    let is_name = |c: char| c != '\r' && c != '\n' && c != ' ' && c != ')';
    let (i, name) = bytes::take_while(is_name)(i)?;
    let (i, _) = character::space0(i)?;
    let (i, _) = character::char(')')(i)?;
    Ok((i, name))
}

/// Eat what may follow a marker keyword: an optional assignee, an optional
/// colon and the whitespace around them.
///
/// ```rust
/// use todo_search_lib::marker::marker_tail;
///
/// assert_eq!(marker_tail("(schell): do it"), Ok(("do it", Some("schell"))));
/// assert_eq!(marker_tail(": do it"), Ok(("do it", None)));
/// assert_eq!(marker_tail(" do it"), Ok(("do it", None)));
/// ```
pub fn marker_tail(i: &str) -> IResult<&str, Option<&str>> {
    let (i, _) = character::space0(i)?;
    let (i, may_name) = combinator::opt(assignee).parse(i)?;
    let (i, _) = character::space0(i)?;
    let (i, _) = combinator::opt(character::char(':')).parse(i)?;
    let (i, _) = character::space0(i)?;
    Ok((i, may_name.filter(|name| !name.is_empty())))
}

fn strip_suffixes<'a>(i: &'a str, suffixes: &[&str]) -> &'a str {
    suffixes
        .iter()
        .find_map(|suffix| i.strip_suffix(*suffix))
        .unwrap_or(i)
}

/// Strip the marker and its comment syntax from a matched line, leaving the
/// human readable part. Text before the marker is kept.
///
/// ```rust
/// use todo_search_lib::marker::clean_line;
///
/// assert_eq!(clean_line("TODO", "  // TODO: fix this  "), "fix this");
/// assert_eq!(clean_line("FIXME", "/* FIXME(ana) leaks */"), "leaks");
/// assert_eq!(clean_line("TODO", "let x = 1; // TODO: use y"), "let x = 1; use y");
/// ```
pub fn clean_line(keyword: &str, text: &str) -> String {
    let split = if keyword.is_empty() {
        None
    } else {
        text.split_once(keyword)
    };
    let Some((before, after)) = split else {
        return text.trim().to_owned();
    };

    let before = strip_suffixes(before.trim_end(), COMMENT_OPENERS).trim();
    let after = marker_tail(after).map_or(after, |(rest, _)| rest);
    let after = strip_suffixes(after.trim_end(), COMMENT_CLOSERS).trim();

    match (before.is_empty(), after.is_empty()) {
        (true, _) => after.to_owned(),
        (false, true) => before.to_owned(),
        (false, false) => format!("{before} {after}"),
    }
}
