use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

use crate::block::Origin;

/// A grammar or configuration violation raised while handling one block.
///
/// Messages end with the offending block title so log lines read like
/// `Unrecognized block: Foo`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocsGenError {
    #[error("Body line has less indentation than first line, while declaring block: {0}")]
    UnderIndented(String),

    #[error("Block disallowed outside of {config} file: {title}")]
    ConfigOnly { title: String, config: String },

    #[error("Body not supported, while declaring block: {0}")]
    BodyNotSupported(String),

    #[error("Must provide a subtitle when declaring block: {0}")]
    MissingSubtitle(String),

    #[error("File/LibFile block already specified, while declaring block: {0}")]
    DuplicateFile(String),

    #[error("Must declare File or LibFile block before declaring block: {0}")]
    FileRequired(String),

    #[error("Must declare a Section before declaring block: {0}")]
    SectionRequired(String),

    #[error("Previous declaration of `{name}` at {previous}, Redeclared: {title}")]
    Redeclared {
        name: String,
        previous: Origin,
        title: String,
    },

    #[error("Text between parentheses, while declaring block: {0}")]
    ParenthesizedText(String),

    #[error("Could not parse target block type, while declaring block: {0}")]
    UnknownBlockType(String),

    #[error("Table type is missing Headers= option, while declaring block: {0}")]
    MissingHeaders(String),

    #[error("Unknown type \"{kind}\", while declaring block: {title}")]
    UnknownDocKind { kind: String, title: String },

    #[error("Invalid file pattern \"{pattern}\", while declaring block: {title}")]
    BadPattern { pattern: String, title: String },

    #[error("Unrecognized block: {0}")]
    Unrecognized(String),

    #[error("More tables than header sets, while rendering block: {0}")]
    TooManyTables(String),

    #[error("Fewer cells than table headers, while rendering block: {0}")]
    TooFewCells(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Fail,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("WARNING"),
            Severity::Fail => f.write_str("FAIL"),
        }
    }
}

/// One logged problem, tagged with the origin of the block that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub file: String,
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl LogEntry {
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Fail
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    ///
    /// `line_span` is the byte range of the entry's line inside the file
    /// registered as `file_id`.
    pub fn to_diagnostic<FileId: Copy>(
        &self,
        file_id: FileId,
        line_span: Range<usize>,
    ) -> Diagnostic<FileId> {
        let severity = match self.severity {
            Severity::Warning => codespan_reporting::diagnostic::Severity::Warning,
            Severity::Fail => codespan_reporting::diagnostic::Severity::Error,
        };
        Diagnostic::new(severity)
            .with_message(&self.message)
            .with_labels(vec![Label::primary(file_id, line_span)])
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}:{}: {}",
            self.severity, self.file, self.line, self.message
        )
    }
}

/// Append-only collection of log entries, accumulated across source units.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Vec<LogEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(
        &mut self,
        origin: &Origin,
        message: impl Into<String>,
        severity: Severity,
    ) {
        self.entries.push(LogEntry {
            file: origin.file.clone(),
            line: origin.line,
            severity,
            message: message.into(),
        });
    }

    pub fn fail(&mut self, origin: &Origin, error: &DocsGenError) {
        self.add_entry(origin, error.to_string(), Severity::Fail);
    }

    pub fn warn(&mut self, origin: &Origin, message: impl Into<String>) {
        self.add_entry(origin, message, Severity::Warning);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended after the log held `mark` entries.
    pub fn entries_since(&self, mark: usize) -> &[LogEntry] {
        &self.entries[mark.min(self.entries.len())..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(LogEntry::is_failure)
    }

    pub fn file_has_errors(&self, file: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.is_failure() && entry.file == file)
    }
}
