//! Parser for structured documentation comments embedded in source files.
//!
//! Each documentation block is a run of `//` comment lines opened by a header
//! such as `// Function: foo()` and followed by an indented body. Blocks are
//! assembled into a tree (File, Section, Subsection, Item, leaves) and every
//! documented name is indexed for cross-reference lookup.

pub mod block;
pub mod config;
pub mod document;
pub mod index;
pub mod parser;
pub mod registry;

pub use block::{KindTag, Meta, Node, NodeId, NodeKind, Origin};
pub use config::{DocsOptions, ParserOptions};
pub use document::{Document, NodeData};
pub use parser::{DocsGenError, DocsParser, ErrorLog, LogEntry, ParseOutcome, Severity};
