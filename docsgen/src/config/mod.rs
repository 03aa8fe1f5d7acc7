//! Parser options and the process-wide settings collected from the
//! configuration source.

use std::path::Path;

use glob::Pattern;

/// Default name of the configuration source.
pub const CONFIG_FILE: &str = ".docsgen_rc";

/// Source identifier used for the built-in default definitions.
pub const DEFAULTS_SOURCE: &str = "Defaults";

#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Require a `File`/`LibFile` block before any other block.
    pub strict: bool,
    /// Source identifier under which configuration directives are legal.
    pub config_source: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            strict: false,
            config_source: CONFIG_FILE.to_string(),
        }
    }
}

/// Kinds of generated documents named by a `GenerateDocs` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocKind {
    Files,
    Toc,
    Index,
    Topics,
    CheatSheet,
    Sidebar,
}

impl DocKind {
    /// Parse one `GenerateDocs` entry, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_uppercase().as_str() {
            "FILES" => Some(DocKind::Files),
            "TOC" => Some(DocKind::Toc),
            "INDEX" => Some(DocKind::Index),
            "TOPICS" => Some(DocKind::Topics),
            "CHEAT" | "CHEATSHEET" => Some(DocKind::CheatSheet),
            "SIDEBAR" => Some(DocKind::Sidebar),
            _ => None,
        }
    }
}

/// Settings filled in by configuration directives.
///
/// The engine only records these; acting on them (skipping files, choosing
/// outputs) is up to the caller. `generate` is a default the caller should
/// use only when its own command line names no document kinds.
#[derive(Debug, Clone, Default)]
pub struct DocsOptions {
    pub ignored_patterns: Vec<Pattern>,
    pub priority_files: Vec<String>,
    pub docs_dir: Option<String>,
    pub project_name: Option<String>,
    pub target_profile: Option<String>,
    pub generate: Vec<DocKind>,
}

impl DocsOptions {
    /// True when `path` matches a pattern from an `IgnoreFiles` directive.
    pub fn is_ignored(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.ignored_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
    }
}
