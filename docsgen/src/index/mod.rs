use std::collections::HashMap;

use crate::block::NodeId;

/// Public names (and aliases) of documented items.
///
/// Names are never overwritten: registering a name that is already present
/// fails with the node that owns it.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_name: HashMap<String, NodeId>,
    /// Names in registration order.
    order: Vec<String>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the primary name of `item`.
    pub fn register(&mut self, name: &str, item: NodeId) -> Result<(), NodeId> {
        if let Some(existing) = self.by_name.get(name) {
            return Err(*existing);
        }
        self.by_name.insert(name.to_string(), item);
        self.order.push(name.to_string());
        Ok(())
    }

    /// Register a secondary lookup name for an already registered item.
    pub fn alias(&mut self, name: &str, item: NodeId) -> Result<(), NodeId> {
        self.register(name, item)
    }

    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All names, alphabetically ignoring case; equal keys keep registration order.
    pub fn all_names_sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.order.iter().map(String::as_str).collect();
        names.sort_by_cached_key(|name| name.to_lowercase());
        names
    }

    /// Names registered after the index held `mark` names.
    pub fn names_since(&self, mark: usize) -> &[String] {
        &self.order[mark.min(self.order.len())..]
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
