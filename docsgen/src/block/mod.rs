pub mod meta;
pub mod table;

use std::fmt;

use serde::Serialize;

pub use meta::Meta;
pub use table::Table;

/// Index of a node inside a [`Document`](crate::document::Document) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a block was declared: source unit identifier plus 1-based line of its header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Origin {
    pub file: String,
    pub line: usize,
}

impl Origin {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Origin {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListStyle {
    Numbered,
    Bulleted,
}

/// Attributes only a File node carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    /// One-line summary from `FileSummary`.
    pub summary: String,
    /// Category label from `FileGroup`; empty when ungrouped.
    pub group: String,
    /// `(mark, note)` pairs from `FileFootnotes`.
    pub footnotes: Vec<(String, String)>,
    pub common_code: Vec<String>,
    pub includes: Vec<String>,
}

/// Attributes only an Item node carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemInfo {
    pub aliases: Vec<String>,
    pub topics: Vec<String>,
    pub deprecated: bool,
    pub see_also: Vec<String>,
}

/// The closed set of node kinds, each with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File(FileInfo),
    Section,
    Subsection,
    Item(ItemInfo),
    Text,
    Label,
    List(ListStyle),
    /// A table with one or more alternative header rows.
    Table(Vec<Vec<String>>),
    Example,
    Figure,
    Generic,
    Topics,
    SeeAlso,
}

/// Payload-free tag of a [`NodeKind`], used for parent constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KindTag {
    File,
    Section,
    Subsection,
    Item,
    Text,
    Label,
    List,
    Table,
    Example,
    Figure,
    Generic,
    Topics,
    SeeAlso,
}

impl NodeKind {
    pub fn tag(&self) -> KindTag {
        match self {
            NodeKind::File(_) => KindTag::File,
            NodeKind::Section => KindTag::Section,
            NodeKind::Subsection => KindTag::Subsection,
            NodeKind::Item(_) => KindTag::Item,
            NodeKind::Text => KindTag::Text,
            NodeKind::Label => KindTag::Label,
            NodeKind::List(_) => KindTag::List,
            NodeKind::Table(_) => KindTag::Table,
            NodeKind::Example => KindTag::Example,
            NodeKind::Figure => KindTag::Figure,
            NodeKind::Generic => KindTag::Generic,
            NodeKind::Topics => KindTag::Topics,
            NodeKind::SeeAlso => KindTag::SeeAlso,
        }
    }
}

/// One element of the documentation tree.
///
/// Children are owned through the document arena; `parent` is a plain index
/// used to restore context and is never re-pointed once the node is linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// The header keyword that produced this node (e.g. `Function`, `Usage`).
    pub title: String,
    pub subtitle: String,
    /// Indentation-normalized body lines.
    pub body: Vec<String>,
    pub origin: Origin,
    pub meta: Meta,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(
        kind: NodeKind,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        body: Vec<String>,
        origin: Origin,
    ) -> Self {
        Node {
            kind,
            title: title.into(),
            subtitle: subtitle.into(),
            body,
            origin,
            meta: Meta::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    pub fn file_info(&self) -> Option<&FileInfo> {
        match &self.kind {
            NodeKind::File(info) => Some(info),
            _ => None,
        }
    }

    pub fn item_info(&self) -> Option<&ItemInfo> {
        match &self.kind {
            NodeKind::Item(info) => Some(info),
            _ => None,
        }
    }

    /// Header sets of a Table node.
    pub fn header_sets(&self) -> Option<&[Vec<String>]> {
        match &self.kind {
            NodeKind::Table(sets) => Some(sets),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subtitle.is_empty() {
            write!(f, "{}:", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.subtitle)
        }
    }
}
