pub mod body;
pub mod error;
pub mod header;
mod structural;

pub use error::{DocsGenError, ErrorLog, LogEntry, Severity};

use crate::block::{Node, NodeId};
use crate::config::{DEFAULTS_SOURCE, DocsOptions, ParserOptions};
use crate::document::{Document, NodeData};
use crate::index::NameIndex;
use crate::registry::{BlockRegistry, DEFAULT_DEFINITIONS};

/// What one call to [`DocsParser::parse_lines`] added.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// The unit's File node, if the unit declared or implied one.
    pub root: Option<NodeId>,
    /// Names (including aliases) registered while parsing the unit.
    pub names: Vec<String>,
    /// Log entries appended while parsing the unit.
    pub entries: Vec<LogEntry>,
}

impl ParseOutcome {
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(LogEntry::is_failure)
    }
}

/// Parser entry point.
///
/// One parser accumulates the document tree, the name index and the error
/// log across every source unit it is given. Per-unit context (open file,
/// section, item, and unit-local block definitions) is reset at the start of
/// each unit.
#[derive(Debug, Clone)]
pub struct DocsParser {
    pub(crate) options: ParserOptions,
    pub(crate) docs: DocsOptions,
    pub(crate) registry: BlockRegistry,
    pub(crate) document: Document,
    pub(crate) index: NameIndex,
    pub(crate) log: ErrorLog,
}

impl Default for DocsParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl DocsParser {
    pub fn new(options: ParserOptions) -> Self {
        let mut parser = DocsParser {
            options,
            docs: DocsOptions::default(),
            registry: BlockRegistry::builtin(),
            document: Document::new(),
            index: NameIndex::new(),
            log: ErrorLog::new(),
        };
        structural::parse_unit(&mut parser, DEFAULT_DEFINITIONS, DEFAULTS_SOURCE);
        parser.registry.commit_baseline();
        parser
    }

    /// Feed the configuration source, once, before any real source unit.
    ///
    /// Configuration lines carry no comment prefix; each gets `// ` prepended
    /// and the result is parsed like any other unit under the configured
    /// source name. Block definitions made here join the per-unit baseline.
    pub fn load_config(&mut self, text: &str) -> ParseOutcome {
        let lines: Vec<String> = text.lines().map(|line| format!("// {}", line)).collect();
        let source = self.options.config_source.clone();
        let outcome = self.parse_lines(&lines, &source);
        self.registry.commit_baseline();
        outcome
    }

    /// Parse one source unit given as separate lines.
    pub fn parse_lines<S: AsRef<str>>(&mut self, lines: &[S], source_id: &str) -> ParseOutcome {
        let names_mark = self.index.len();
        let log_mark = self.log.len();

        let root = structural::parse_unit(self, lines, source_id);

        ParseOutcome {
            root,
            names: self.index.names_since(names_mark).to_vec(),
            entries: self.log.entries_since(log_mark).to_vec(),
        }
    }

    /// Parse one source unit given as text.
    pub fn parse_source(&mut self, source: &str, source_id: &str) -> ParseOutcome {
        let lines: Vec<&str> = source.lines().collect();
        self.parse_lines(&lines, source_id)
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn docs_options(&self) -> &DocsOptions {
        &self.docs
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn index(&self) -> &NameIndex {
        &self.index
    }

    pub fn log(&self) -> &ErrorLog {
        &self.log
    }

    /// The Item registered under `name` (primary name or alias).
    pub fn item(&self, name: &str) -> Option<&Node> {
        self.index.lookup(name).map(|id| self.document.node(id))
    }

    /// Every indexed name, alphabetically.
    pub fn indexed_names(&self) -> Vec<&str> {
        self.index.all_names_sorted()
    }

    /// Data view of the item registered under `name`.
    pub fn indexed_data(&self, name: &str) -> Option<NodeData> {
        self.index.lookup(name).map(|id| self.document.node_data(id))
    }

    pub fn all_data(&self) -> Vec<NodeData> {
        self.document.all_data()
    }

    /// File roots, with files named by `PrioritizeFiles` first.
    pub fn files_prioritized(&self) -> Vec<NodeId> {
        self.document.files_prioritized(&self.docs.priority_files)
    }

    /// Debug dump of every parsed file, in prioritized order.
    pub fn dump_full_tree(&self) -> String {
        self.document.dump_tree(&self.files_prioritized(), 6)
    }
}
