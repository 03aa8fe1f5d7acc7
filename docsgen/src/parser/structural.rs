use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use glob::Pattern;

use crate::block::{FileInfo, ItemInfo, Meta, Node, NodeId, NodeKind, Origin};
use crate::config::DocKind;
use crate::parser::DocsParser;
use crate::parser::body::{COMMENT_PREFIX, extract_body};
use crate::parser::error::DocsGenError;
use crate::parser::header::{is_header, match_header};
use crate::registry::{BlockHook, BlockRule, DEFINE_HEADER, LeafKind};

// ---------------------------------------------------------------------------
// Grammar constants
// ---------------------------------------------------------------------------

const ITEM_TITLES: &[&str] = &["Constant", "Function", "Module", "Function&Module"];

/// Directives only legal inside the configuration source.
const CONFIG_DIRECTIVES: &[&str] = &[
    "IgnoreFiles",
    "PrioritizeFiles",
    "DocsDirectory",
    "ProjectName",
    "TargetProfile",
    "GenerateDocs",
];

const FILE_METADATA: &[&str] = &[
    "Includes",
    "CommonCode",
    "FileSummary",
    "FileGroup",
    "FileFootnotes",
];

static PARENTHESIZED_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]+\)").expect("parenthesized text pattern is a valid regex"));

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse one source unit into the parser's document, index and log.
///
/// Returns the unit's File node, if one was declared or implied.
pub(super) fn parse_unit<S: AsRef<str>>(
    parser: &mut DocsParser,
    lines: &[S],
    source_id: &str,
) -> Option<NodeId> {
    parser.registry.reset_to_defaults();
    debug!(source = source_id, lines = lines.len(), "parsing unit");

    let mut state = ParseState {
        parser,
        source_id,
        ctx: Context::default(),
    };
    let mut idx = 0;
    while idx < lines.len() {
        idx = state.parse_block(lines, idx);
    }
    state.close_item();
    state.ctx.file
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

/// A header plus its body, ready for dispatch.
#[derive(Debug)]
struct Block {
    title: String,
    meta: Meta,
    subtitle: String,
    body: Vec<String>,
    origin: Origin,
}

impl Block {
    fn into_node(self, kind: NodeKind) -> Node {
        Node::new(kind, self.title, self.subtitle, self.body, self.origin).with_meta(self.meta)
    }
}

/// Open containers of the unit being parsed.
#[derive(Debug, Default)]
struct Context {
    file: Option<NodeId>,
    section: Option<NodeId>,
    subsection: Option<NodeId>,
    item: Option<NodeId>,
    /// Where new leaves attach: the innermost open container.
    parent: Option<NodeId>,
}

struct ParseState<'p> {
    parser: &'p mut DocsParser,
    source_id: &'p str,
    ctx: Context,
}

#[derive(Debug, Clone, Copy)]
enum ItemList {
    Topics,
    SeeAlso,
}

impl ParseState<'_> {
    /// Find the next header at or after `idx`, handle its block, and return
    /// the index to continue from.
    fn parse_block<S: AsRef<str>>(&mut self, lines: &[S], idx: usize) -> usize {
        let idx = self.skip_lines(lines, idx);
        let Some(line) = lines.get(idx) else {
            return idx;
        };
        let Some(header) = match_header(line.as_ref()) else {
            return idx + 1;
        };
        let origin = Origin::new(self.source_id, idx + 1);
        trace!(title = header.title, line = origin.line, "header");

        let body = match extract_body(lines, idx + 1) {
            Ok(body) => body,
            Err(under) => {
                self.fail(
                    &origin,
                    DocsGenError::UnderIndented(header.title.to_string()),
                );
                return under.line;
            }
        };

        let block = Block {
            title: header.title.to_string(),
            meta: Meta::parse(header.meta),
            subtitle: header.subtitle.to_string(),
            body: body.lines,
            origin: origin.clone(),
        };
        if let Err(err) = self.dispatch(block) {
            self.fail(&origin, err);
        }

        let continues = lines
            .get(body.next)
            .is_some_and(|next| next.as_ref().starts_with(COMMENT_PREFIX));
        if !continues {
            self.close_item();
        }
        body.next
    }

    /// Advance to the next header line. Any non-comment line on the way
    /// closes the open item.
    fn skip_lines<S: AsRef<str>>(&mut self, lines: &[S], mut idx: usize) -> usize {
        while let Some(line) = lines.get(idx) {
            let line = line.as_ref();
            if !line.starts_with(COMMENT_PREFIX) {
                self.close_item();
            }
            if is_header(line) {
                return idx;
            }
            idx += 1;
        }
        self.close_item();
        idx
    }

    fn close_item(&mut self) {
        if let Some(item) = self.ctx.item.take() {
            self.ctx.parent = self.parser.document.node(item).parent();
            trace!(item = item.index(), "item scope closed");
        }
    }

    fn fail(&mut self, origin: &Origin, err: DocsGenError) {
        debug!(%origin, error = %err, "block rejected");
        self.parser.log.fail(origin, &err);
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    fn dispatch(&mut self, block: Block) -> Result<(), DocsGenError> {
        debug!(title = %block.title, origin = %block.origin, "dispatch");
        let title = block.title.clone();
        match title.as_str() {
            DEFINE_HEADER => self.define_header(block),
            t if CONFIG_DIRECTIVES.contains(&t) => self.config_directive(block),
            "File" | "LibFile" => self.open_file(block),
            _ if self.ctx.file.is_none() && self.parser.options.strict => {
                Err(DocsGenError::FileRequired(block.title))
            }
            "Section" => self.open_section(block),
            "Subsection" => self.open_subsection(block),
            t if FILE_METADATA.contains(&t) => self.file_metadata(block),
            t if ITEM_TITLES.contains(&t) && !self.parser.registry.contains(t) => {
                self.open_item(block)
            }
            _ => self.dispatch_leaf(block),
        }
    }

    /// Blocks that attach content to the current parent.
    fn dispatch_leaf(&mut self, block: Block) -> Result<(), DocsGenError> {
        let title = block.title.clone();
        match title.as_str() {
            "Example" | "Figure" => self.image_block(block),
            "Examples" | "Figures" => self.image_blocks(block),
            t if self.parser.registry.contains(t) => {
                match self.parser.registry.lookup(t).cloned() {
                    Some(rule) => self.leaf_block(block, rule),
                    None => Err(DocsGenError::Unrecognized(block.title)),
                }
            }
            "Topics" => self.item_list(block, ItemList::Topics),
            "See Also" => self.item_list(block, ItemList::SeeAlso),
            _ => Err(DocsGenError::Unrecognized(block.title)),
        }
    }

    // -----------------------------------------------------------------------
    // Directives
    // -----------------------------------------------------------------------

    fn define_header(&mut self, block: Block) -> Result<(), DocsGenError> {
        let name = block.subtitle.trim();
        if name.is_empty() {
            return Err(DocsGenError::MissingSubtitle(block.title));
        }
        self.parser.registry.define(name, &block.meta)?;
        debug!(name, options = block.meta.raw(), "block type defined");
        Ok(())
    }

    fn config_directive(&mut self, block: Block) -> Result<(), DocsGenError> {
        let config = &self.parser.options.config_source;
        if block.origin.file != *config {
            return Err(DocsGenError::ConfigOnly {
                title: block.title,
                config: config.clone(),
            });
        }

        let title = block.title.clone();
        let docs = &mut self.parser.docs;
        match title.as_str() {
            "IgnoreFiles" => {
                let patterns = list_lines(&block.subtitle, &block.body)
                    .into_iter()
                    .map(|entry| {
                        Pattern::new(&entry).map_err(|_| DocsGenError::BadPattern {
                            pattern: entry.clone(),
                            title: block.title.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                docs.ignored_patterns.extend(patterns);
            }
            "PrioritizeFiles" => {
                docs.priority_files = list_lines(&block.subtitle, &block.body);
            }
            _ => {
                if !block.body.is_empty() {
                    return Err(DocsGenError::BodyNotSupported(block.title));
                }
                let value = block.subtitle.trim();
                if value.is_empty() {
                    return Err(DocsGenError::MissingSubtitle(block.title));
                }
                match title.as_str() {
                    "DocsDirectory" => {
                        docs.docs_dir = Some(value.trim_end_matches('/').to_string());
                    }
                    "ProjectName" => docs.project_name = Some(value.to_string()),
                    "TargetProfile" => docs.target_profile = Some(value.to_string()),
                    "GenerateDocs" => {
                        let mut kinds = Vec::new();
                        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                            let kind =
                                DocKind::parse(part).ok_or_else(|| DocsGenError::UnknownDocKind {
                                    kind: part.to_string(),
                                    title: block.title.clone(),
                                })?;
                            if !kinds.contains(&kind) {
                                kinds.push(kind);
                            }
                        }
                        docs.generate = kinds;
                    }
                    _ => return Err(DocsGenError::Unrecognized(block.title)),
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Containers
    // -----------------------------------------------------------------------

    fn open_file(&mut self, block: Block) -> Result<(), DocsGenError> {
        if self.ctx.file.is_some() {
            return Err(DocsGenError::DuplicateFile(block.title));
        }
        let id = self
            .parser
            .document
            .add_file(block.into_node(NodeKind::File(FileInfo::default())));
        self.ctx = Context {
            file: Some(id),
            parent: Some(id),
            ..Context::default()
        };
        Ok(())
    }

    /// The unit's File node, creating a placeholder named after the source
    /// when none was declared.
    fn ensure_file(&mut self, origin: &Origin) -> NodeId {
        if let Some(file) = self.ctx.file {
            return file;
        }
        let placeholder = Node::new(
            NodeKind::File(FileInfo::default()),
            "LibFile",
            origin.file.clone(),
            Vec::new(),
            origin.clone(),
        );
        let id = self.parser.document.add_file(placeholder);
        self.ctx.file = Some(id);
        self.ctx.parent = Some(id);
        id
    }

    fn open_section(&mut self, block: Block) -> Result<(), DocsGenError> {
        let file = self.ensure_file(&block.origin);
        let id = self
            .parser
            .document
            .add_child(file, block.into_node(NodeKind::Section));
        self.ctx.section = Some(id);
        self.ctx.subsection = None;
        self.ctx.item = None;
        self.ctx.parent = Some(id);
        Ok(())
    }

    fn open_subsection(&mut self, block: Block) -> Result<(), DocsGenError> {
        let Some(section) = self.ctx.section else {
            return Err(DocsGenError::SectionRequired(block.title));
        };
        if block.subtitle.is_empty() {
            return Err(DocsGenError::MissingSubtitle(block.title));
        }
        let id = self
            .parser
            .document
            .add_child(section, block.into_node(NodeKind::Subsection));
        self.ctx.subsection = Some(id);
        self.ctx.item = None;
        self.ctx.parent = Some(id);
        Ok(())
    }

    fn file_metadata(&mut self, block: Block) -> Result<(), DocsGenError> {
        let needs_subtitle = !matches!(block.title.as_str(), "Includes" | "CommonCode");
        if needs_subtitle && block.subtitle.is_empty() {
            return Err(DocsGenError::MissingSubtitle(block.title));
        }

        let footnotes = if block.title == "FileFootnotes" {
            self.parse_footnotes(&block)
        } else {
            Vec::new()
        };

        let file = self.ensure_file(&block.origin);
        let Some(info) = self.parser.document.file_info_mut(file) else {
            return Ok(());
        };
        match block.title.as_str() {
            "Includes" => info.includes.extend(block.body),
            "CommonCode" => info.common_code.extend(block.body),
            "FileSummary" => info.summary = block.subtitle.trim().to_string(),
            "FileGroup" => info.group = block.subtitle.trim().to_string(),
            "FileFootnotes" => info.footnotes = footnotes,
            _ => {}
        }
        Ok(())
    }

    /// `mark=note;mark=note`. A part without `=` is kept with an empty note
    /// and logged as a warning.
    fn parse_footnotes(&mut self, block: &Block) -> Vec<(String, String)> {
        let mut footnotes = Vec::new();
        for part in block.subtitle.split(';').map(str::trim) {
            if part.is_empty() {
                continue;
            }
            match part.split_once('=') {
                Some((mark, note)) => {
                    footnotes.push((mark.trim().to_string(), note.trim().to_string()));
                }
                None => {
                    self.parser.log.warn(
                        &block.origin,
                        format!(
                            "Footnote `{}` has no note text, while declaring block: {}",
                            part, block.title
                        ),
                    );
                    footnotes.push((part.to_string(), String::new()));
                }
            }
        }
        footnotes
    }

    fn open_item(&mut self, block: Block) -> Result<(), DocsGenError> {
        let file = self.ensure_file(&block.origin);
        let section = match self.ctx.section {
            Some(section) => section,
            None => {
                let anonymous = Node::new(
                    NodeKind::Section,
                    "Section",
                    "",
                    Vec::new(),
                    block.origin.clone(),
                );
                let section = self.parser.document.add_child(file, anonymous);
                self.ctx.section = Some(section);
                section
            }
        };
        let container = self.ctx.subsection.unwrap_or(section);
        self.ctx.item = None;
        self.ctx.parent = Some(container);

        if block.subtitle.is_empty() {
            return Err(DocsGenError::MissingSubtitle(block.title));
        }
        if let Some(existing) = self.parser.index.lookup(&block.subtitle) {
            return Err(DocsGenError::Redeclared {
                name: block.subtitle,
                previous: self.parser.document.node(existing).origin.clone(),
                title: block.title,
            });
        }
        if PARENTHESIZED_TEXT.is_match(&block.subtitle) {
            return Err(DocsGenError::ParenthesizedText(block.title));
        }

        let (own_body, sub_blocks) = split_sub_blocks(&block.body, &block.origin);
        let name = block.subtitle.clone();
        let node = Node::new(
            NodeKind::Item(ItemInfo::default()),
            block.title,
            block.subtitle,
            own_body,
            block.origin,
        )
        .with_meta(block.meta);
        let id = self.parser.document.add_child(container, node);
        // Name availability was checked above.
        let _ = self.parser.index.register(&name, id);
        self.ctx.item = Some(id);
        self.ctx.parent = Some(id);

        for sub in sub_blocks {
            let origin = sub.origin.clone();
            if let Err(err) = self.dispatch_leaf(sub) {
                self.fail(&origin, err);
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Leaves
    // -----------------------------------------------------------------------

    fn image_block(&mut self, block: Block) -> Result<(), DocsGenError> {
        let Some(item) = self.ctx.item else {
            debug!(title = %block.title, origin = %block.origin, "dropped outside item");
            return Ok(());
        };
        let kind = if block.title == "Figure" {
            NodeKind::Figure
        } else {
            NodeKind::Example
        };
        self.parser.document.add_child(item, block.into_node(kind));
        Ok(())
    }

    /// `Examples` / `Figures`: one node per body line.
    fn image_blocks(&mut self, block: Block) -> Result<(), DocsGenError> {
        let Some(item) = self.ctx.item else {
            debug!(title = %block.title, origin = %block.origin, "dropped outside item");
            return Ok(());
        };
        let (title, kind) = if block.title == "Figures" {
            ("Figure", NodeKind::Figure)
        } else {
            ("Example", NodeKind::Example)
        };
        let mut subtitle = block.subtitle;
        for (n, line) in block.body.into_iter().enumerate() {
            let origin = Origin::new(block.origin.file.clone(), block.origin.line + n + 1);
            let node = Node::new(kind.clone(), title, std::mem::take(&mut subtitle), vec![line], origin)
                .with_meta(block.meta.clone());
            self.parser.document.add_child(item, node);
        }
        Ok(())
    }

    /// A block whose title was found in the registry.
    ///
    /// A rule without a parent constraint opens the placeholder File when
    /// nothing is open yet. Otherwise the block is dropped without error when
    /// the parent kind does not satisfy the rule.
    fn leaf_block(&mut self, mut block: Block, rule: BlockRule) -> Result<(), DocsGenError> {
        let parent = match (self.ctx.parent, rule.parent) {
            (Some(parent), _) => parent,
            (None, None) => self.ensure_file(&block.origin),
            (None, Some(_)) => {
                debug!(title = %block.title, origin = %block.origin, "dropped without parent");
                return Ok(());
            }
        };
        if let Some(required) = rule.parent {
            if self.parser.document.node(parent).tag() != required {
                debug!(title = %block.title, origin = %block.origin, "dropped, parent kind mismatch");
                return Ok(());
            }
        }

        match rule.kind {
            LeafKind::Label if !block.body.is_empty() => {
                return Err(DocsGenError::BodyNotSupported(block.title));
            }
            LeafKind::Text if !block.subtitle.is_empty() => {
                let subtitle = std::mem::take(&mut block.subtitle);
                block.body.insert(0, subtitle);
            }
            _ => {}
        }

        let aliases = match rule.hook {
            Some(BlockHook::Aliases) => self.check_aliases(&block)?,
            _ => Vec::new(),
        };
        let deprecated = block.subtitle.contains("DEPRECATED");

        self.parser
            .document
            .add_child(parent, block.into_node(rule.kind.to_node_kind()));

        match rule.hook {
            Some(BlockHook::Status) => {
                if let Some(info) = self.parser.document.item_info_mut(parent) {
                    info.deprecated = deprecated;
                }
            }
            Some(BlockHook::Aliases) => {
                for alias in aliases {
                    if self.parser.index.alias(&alias, parent).is_ok() {
                        if let Some(info) = self.parser.document.item_info_mut(parent) {
                            info.aliases.push(alias);
                        }
                    }
                }
            }
            None => {}
        }
        Ok(())
    }

    /// Alias names from the subtitle, failing if any is already indexed.
    fn check_aliases(&self, block: &Block) -> Result<Vec<String>, DocsGenError> {
        let mut aliases: Vec<String> = Vec::new();
        for name in split_list(&block.subtitle) {
            if let Some(existing) = self.parser.index.lookup(&name) {
                return Err(DocsGenError::Redeclared {
                    name,
                    previous: self.parser.document.node(existing).origin.clone(),
                    title: block.title.clone(),
                });
            }
            if !aliases.contains(&name) {
                aliases.push(name);
            }
        }
        Ok(aliases)
    }

    /// `Topics` / `See Also`: a node under the open item plus the parsed
    /// entries on the item itself.
    fn item_list(&mut self, block: Block, list: ItemList) -> Result<(), DocsGenError> {
        let Some(item) = self.ctx.item else {
            debug!(title = %block.title, origin = %block.origin, "dropped outside item");
            return Ok(());
        };
        let mut entries = split_list(&block.subtitle);
        entries.extend(block.body.iter().flat_map(|line| split_list(line)));

        let kind = match list {
            ItemList::Topics => NodeKind::Topics,
            ItemList::SeeAlso => NodeKind::SeeAlso,
        };
        self.parser.document.add_child(item, block.into_node(kind));
        if let Some(info) = self.parser.document.item_info_mut(item) {
            match list {
                ItemList::Topics => info.topics.extend(entries),
                ItemList::SeeAlso => info.see_also.extend(entries),
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Comma-separated entries, trimmed, empties dropped.
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// The subtitle (if any) followed by each body line, trimmed.
fn list_lines(subtitle: &str, body: &[String]) -> Vec<String> {
    std::iter::once(subtitle)
        .chain(body.iter().map(String::as_str))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_underline(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

/// Split an item body at underlined sub-headings.
///
/// ```text
/// Description
/// -----------
/// Does a thing.
/// ```
///
/// becomes a `Description` block with body `["Does a thing."]`. Lines before
/// the first sub-heading stay with the item.
fn split_sub_blocks(body: &[String], origin: &Origin) -> (Vec<String>, Vec<Block>) {
    let mut own = Vec::new();
    let mut blocks: Vec<Block> = Vec::new();
    let mut i = 0;

    while i < body.len() {
        let line = &body[i];
        let is_heading = !line.trim().is_empty()
            && !is_underline(line)
            && body.get(i + 1).is_some_and(|next| is_underline(next));
        if is_heading {
            blocks.push(Block {
                title: line.trim().to_string(),
                meta: Meta::default(),
                subtitle: String::new(),
                body: Vec::new(),
                origin: Origin::new(origin.file.clone(), origin.line + i + 1),
            });
            i += 2;
            continue;
        }
        match blocks.last_mut() {
            Some(block) => block.body.push(line.clone()),
            None => own.push(line.clone()),
        }
        i += 1;
    }

    (own, blocks)
}
