pub mod data;

use std::fmt::Write as _;

use crate::block::{FileInfo, ItemInfo, Node, NodeId, NodeKind};

pub use data::{NodeData, UsageData};

/// Arena holding every node parsed so far.
///
/// Ownership runs from parent to children through `Node::children`; parent
/// links are indices into the same arena and never own anything.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    /// File roots, in parse order.
    files: Vec<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a File node as a new root.
    pub fn add_file(&mut self, node: Node) -> NodeId {
        let id = self.push(node);
        self.files.push(id);
        id
    }

    /// Add `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        let id = self.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn file_info_mut(&mut self, id: NodeId) -> Option<&mut FileInfo> {
        match &mut self.nodes[id.0].kind {
            NodeKind::File(info) => Some(info),
            _ => None,
        }
    }

    pub(crate) fn item_info_mut(&mut self, id: NodeId) -> Option<&mut ItemInfo> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Item(info) => Some(info),
            _ => None,
        }
    }

    pub fn files(&self) -> &[NodeId] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.node(id).children.iter().map(|child| self.node(*child))
    }

    /// Children of `id` whose header title is `title`.
    pub fn children_titled<'a>(
        &'a self,
        id: NodeId,
        title: &'a str,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.children(id).filter(move |child| child.title == title)
    }

    /// The File root above `id` (or `id` itself).
    pub fn file_of(&self, mut id: NodeId) -> NodeId {
        while let Some(parent) = self.node(id).parent {
            id = parent;
        }
        id
    }

    /// File roots with the named priority files first, the rest in parse order.
    pub fn files_prioritized(&self, priority: &[String]) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::with_capacity(self.files.len());
        for name in priority {
            for file in &self.files {
                if self.node(*file).subtitle == *name && !out.contains(file) {
                    out.push(*file);
                }
            }
        }
        for file in &self.files {
            if !out.contains(file) {
                out.push(*file);
            }
        }
        out
    }

    /// Indented debug dump of the subtrees rooted at `roots`.
    pub fn dump_tree(&self, roots: &[NodeId], max_depth: usize) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, roots, "", max_depth);
        out
    }

    fn dump_into(&self, out: &mut String, ids: &[NodeId], prefix: &str, depth: usize) {
        if depth == 0 {
            return;
        }
        for id in ids {
            let node = self.node(*id);
            let _ = writeln!(out, "{}{}", prefix, node);
            for line in &node.body {
                let _ = writeln!(out, "  {}{}", prefix, line);
            }
            let nested = format!("{}  ", prefix);
            self.dump_into(out, &node.children, &nested, depth - 1);
        }
    }
}
