//! Serializable views of parsed nodes, for callers that want plain data
//! instead of walking the arena.

use serde::Serialize;

use crate::block::{NodeId, NodeKind};
use crate::document::Document;

/// Child titles folded into dedicated fields of an item's data.
const ITEM_FIELD_TITLES: &[&str] = &[
    "Status",
    "Alias",
    "Aliases",
    "Topics",
    "See Also",
    "Usage",
    "Description",
    "Arguments",
    "Example",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageData {
    pub subtitle: String,
    pub body: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeData {
    pub name: String,
    pub subtitle: String,
    pub body: Vec<String>,
    pub file: String,
    pub line: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub footnotes: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commoncode: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub see_also: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub usages: Vec<UsageData>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Vec<String>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeData>,
}

impl Document {
    /// Data view of the subtree rooted at `id`.
    pub fn node_data(&self, id: NodeId) -> NodeData {
        let node = self.node(id);
        let mut data = NodeData {
            name: node.title.clone(),
            subtitle: node.subtitle.clone(),
            body: node.body.clone(),
            file: node.origin.file.clone(),
            line: node.origin.line,
            ..NodeData::default()
        };

        match &node.kind {
            NodeKind::File(info) => {
                data.summary = Some(info.summary.clone()).filter(|s| !s.is_empty());
                data.group = Some(info.group.clone()).filter(|s| !s.is_empty());
                data.footnotes = info.footnotes.clone();
                data.includes = info.includes.clone();
                data.commoncode = info.common_code.clone();
                data.children = node.children.iter().map(|c| self.node_data(*c)).collect();
            }
            NodeKind::Item(info) => {
                data.deprecated = Some(info.deprecated);
                data.topics = info.topics.clone();
                data.aliases = info.aliases.clone();
                data.see_also = info.see_also.clone();
                data.usages = self
                    .children_titled(id, "Usage")
                    .map(|usage| UsageData {
                        subtitle: usage.subtitle.clone(),
                        body: usage.body.clone(),
                    })
                    .collect();
                data.description = self
                    .children_titled(id, "Description")
                    .flat_map(|desc| desc.body.iter().cloned())
                    .collect();
                data.arguments = self
                    .children_titled(id, "Arguments")
                    .flat_map(|args| args.body.iter().cloned())
                    .collect();
                data.examples = self
                    .children_titled(id, "Example")
                    .map(|example| example.body.clone())
                    .collect();
                data.children = node
                    .children
                    .iter()
                    .filter(|c| !ITEM_FIELD_TITLES.contains(&self.node(**c).title.as_str()))
                    .map(|c| self.node_data(*c))
                    .collect();
            }
            _ => {
                data.children = node.children.iter().map(|c| self.node_data(*c)).collect();
            }
        }
        data
    }

    /// Data views of every File root, in parse order.
    pub fn all_data(&self) -> Vec<NodeData> {
        self.files.iter().map(|file| self.node_data(*file)).collect()
    }
}
