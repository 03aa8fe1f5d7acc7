//! Block type registry.
//!
//! Maps a header title to the rule that says where such a block may appear
//! and what node it becomes. The registry keeps two tables:
//!
//! - the **baseline**: built-in rules, the default definitions, and anything
//!   the configuration source declared;
//! - the **active** table: the baseline plus `DefineHeader`s seen in the
//!   current source unit.
//!
//! `reset_to_defaults` copies the baseline over the active table at the start
//! of every unit, so per-unit definitions never leak into the next unit.

use std::collections::HashMap;

use crate::block::{KindTag, ListStyle, Meta, NodeKind};
use crate::parser::error::DocsGenError;

/// The node kind a registered title produces, with its static payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafKind {
    Text,
    Label,
    NumList,
    BulletList,
    /// Table with its header sets.
    Table(Vec<Vec<String>>),
    Example,
    Figure,
    Generic,
}

impl LeafKind {
    pub fn to_node_kind(&self) -> NodeKind {
        match self {
            LeafKind::Text => NodeKind::Text,
            LeafKind::Label => NodeKind::Label,
            LeafKind::NumList => NodeKind::List(ListStyle::Numbered),
            LeafKind::BulletList => NodeKind::List(ListStyle::Bulleted),
            LeafKind::Table(sets) => NodeKind::Table(sets.clone()),
            LeafKind::Example => NodeKind::Example,
            LeafKind::Figure => NodeKind::Figure,
            LeafKind::Generic => NodeKind::Generic,
        }
    }
}

/// Side effect applied to the open Item when a block is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHook {
    /// Marks the item deprecated when the subtitle says `DEPRECATED`.
    Status,
    /// Registers the comma-separated subtitle entries as item aliases.
    Aliases,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRule {
    /// Kind the current parent must have; `None` accepts any parent.
    pub parent: Option<KindTag>,
    pub kind: LeafKind,
    pub hook: Option<BlockHook>,
}

impl BlockRule {
    pub fn new(kind: LeafKind) -> Self {
        BlockRule {
            parent: None,
            kind,
            hook: None,
        }
    }

    pub fn item_only(mut self) -> Self {
        self.parent = Some(KindTag::Item);
        self
    }

    pub fn with_hook(mut self, hook: BlockHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Build a rule from `DefineHeader` options such as `Table;ItemOnly;Headers=A|B`.
    ///
    /// The first kind flag found, in the order `NumList`, `BulletList`,
    /// `Table`, `Example`, `Figure`, `Label`, `Text`, `Generic`, wins.
    pub fn from_options(options: &Meta) -> Result<Self, DocsGenError> {
        let kind = if options.has("NumList") {
            LeafKind::NumList
        } else if options.has("BulletList") {
            LeafKind::BulletList
        } else if options.has("Table") {
            let headers = options
                .get("Headers")
                .ok_or_else(|| DocsGenError::MissingHeaders(DEFINE_HEADER.to_string()))?;
            LeafKind::Table(parse_header_sets(headers))
        } else if options.has("Example") {
            LeafKind::Example
        } else if options.has("Figure") {
            LeafKind::Figure
        } else if options.has("Label") {
            LeafKind::Label
        } else if options.has("Text") {
            LeafKind::Text
        } else if options.has("Generic") {
            LeafKind::Generic
        } else {
            return Err(DocsGenError::UnknownBlockType(DEFINE_HEADER.to_string()));
        };

        let rule = BlockRule::new(kind);
        Ok(if options.has("ItemOnly") {
            rule.item_only()
        } else {
            rule
        })
    }
}

pub const DEFINE_HEADER: &str = "DefineHeader";

/// Split `A|B||C|D` into header sets `[[A, B], [C, D]]`.
pub fn parse_header_sets(headers: &str) -> Vec<Vec<String>> {
    headers.split("||")
        .map(|set| set.split('|').map(|h| h.trim().to_string()).collect())
        .collect()
}

/// Default definitions, parsed as regular source lines when a parser is created.
pub const DEFAULT_DEFINITIONS: &[&str] = &[
    "// DefineHeader(Text): Text",
    "// DefineHeader(Text;ItemOnly): Description",
    "// DefineHeader(BulletList;ItemOnly): Usage",
];

#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    baseline: HashMap<String, BlockRule>,
    active: HashMap<String, BlockRule>,
}

impl BlockRegistry {
    /// A registry holding only the built-in rules.
    pub fn builtin() -> Self {
        let by_position = vec!["By Position".to_string(), "What it does".to_string()];
        let by_name = vec!["By Name".to_string(), "What it does".to_string()];
        let rules = [
            (
                "Status",
                BlockRule::new(LeafKind::Label)
                    .item_only()
                    .with_hook(BlockHook::Status),
            ),
            (
                "Alias",
                BlockRule::new(LeafKind::Label)
                    .item_only()
                    .with_hook(BlockHook::Aliases),
            ),
            (
                "Aliases",
                BlockRule::new(LeafKind::Label)
                    .item_only()
                    .with_hook(BlockHook::Aliases),
            ),
            (
                "Arguments",
                BlockRule::new(LeafKind::Table(vec![by_position, by_name])).item_only(),
            ),
        ];
        let baseline: HashMap<String, BlockRule> = rules
            .into_iter()
            .map(|(title, rule)| (title.to_string(), rule))
            .collect();
        BlockRegistry {
            active: baseline.clone(),
            baseline,
        }
    }

    /// Drop every rule defined since the last `commit_baseline`.
    pub fn reset_to_defaults(&mut self) {
        self.active = self.baseline.clone();
    }

    /// Make the active rules the new baseline.
    pub fn commit_baseline(&mut self) {
        self.baseline = self.active.clone();
    }

    /// Install a rule for `title` from `DefineHeader` options.
    ///
    /// Returns the rule it replaced, if any.
    pub fn define(
        &mut self,
        title: &str,
        options: &Meta,
    ) -> Result<Option<BlockRule>, DocsGenError> {
        let rule = BlockRule::from_options(options)?;
        Ok(self.insert(title, rule))
    }

    pub fn insert(&mut self, title: &str, rule: BlockRule) -> Option<BlockRule> {
        self.active.insert(title.trim().to_string(), rule)
    }

    pub fn lookup(&self, title: &str) -> Option<&BlockRule> {
        self.active.get(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.active.contains_key(title)
    }

    /// Active titles, sorted.
    pub fn titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = self.active.keys().map(String::as_str).collect();
        titles.sort_unstable();
        titles
    }
}
