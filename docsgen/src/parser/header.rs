//! Block header recognition.
//!
//! A header line looks like `// Title(meta): subtitle`. The title is one or
//! two capitalized words built from letters, digits, `_`, `&` and `-`; the
//! parenthesized meta and the subtitle are optional, the colon is not.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^// ([A-Z][A-Za-z0-9_&-]*( ?[A-Z][A-Za-z0-9_&-]*)?)(\([^)]*\))?:( .*)?$")
        .expect("header pattern is a valid regex")
});

/// The parts of a matched header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub title: &'a str,
    /// Text between the parentheses, or empty.
    pub meta: &'a str,
    /// Trimmed text after the colon, or empty.
    pub subtitle: &'a str,
}

/// Match `line` against the header grammar.
pub fn match_header(line: &str) -> Option<Header<'_>> {
    let caps = HEADER_PATTERN.captures(line)?;
    let title = caps.get(1).map_or("", |m| m.as_str());
    let meta = caps
        .get(3)
        .map_or("", |m| &m.as_str()[1..m.as_str().len() - 1]);
    let subtitle = caps.get(4).map_or("", |m| m.as_str().trim());
    Some(Header {
        title,
        meta,
        subtitle,
    })
}

pub fn is_header(line: &str) -> bool {
    HEADER_PATTERN.is_match(line)
}
