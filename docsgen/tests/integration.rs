use docsgen::block::Table;
use docsgen::config::DocKind;
use docsgen::document::UsageData;
use docsgen::{DocsGenError, DocsParser, KindTag, Node, NodeId, ParseOutcome, ParserOptions, Severity};
use pretty_assertions::assert_eq;

fn parse(source: &str) -> (DocsParser, ParseOutcome) {
    parse_as(source, "test.scad")
}

fn parse_as(source: &str, source_id: &str) -> (DocsParser, ParseOutcome) {
    let mut parser = DocsParser::default();
    let outcome = parser.parse_source(source, source_id);
    (parser, outcome)
}

fn messages(outcome: &ParseOutcome) -> Vec<&str> {
    outcome.entries.iter().map(|e| e.message.as_str()).collect()
}

fn children<'a>(parser: &'a DocsParser, id: NodeId) -> Vec<&'a Node> {
    parser.document().children(id).collect()
}

fn item<'a>(parser: &'a DocsParser, name: &str) -> &'a Node {
    parser.item(name).unwrap_or_else(|| panic!("{} should be indexed", name))
}

fn item_id(parser: &DocsParser, name: &str) -> NodeId {
    parser.index().lookup(name).unwrap()
}

// --- Tree shape ---

#[test]
fn function_with_underlined_description() {
    let lines = [
        "// LibFile: foo.scad",
        "// Function: bar()",
        "//   Description",
        "//   -----------",
        "//   Does a thing.",
        "x = 1;",
        "// Function: bar()",
    ];
    let mut parser = DocsParser::default();
    let outcome = parser.parse_lines(&lines, "foo.scad");
    let doc = parser.document();

    let root = outcome.root.unwrap();
    assert_eq!(doc.files(), &[root]);
    let file = doc.node(root);
    assert_eq!(file.tag(), KindTag::File);
    assert_eq!(file.subtitle, "foo.scad");

    let sections = file.children();
    assert_eq!(sections.len(), 1);
    assert_eq!(doc.node(sections[0]).tag(), KindTag::Section);

    let items = doc.node(sections[0]).children();
    assert_eq!(items.len(), 1);
    let bar = doc.node(items[0]);
    assert_eq!(bar.tag(), KindTag::Item);
    assert_eq!(bar.subtitle, "bar()");
    assert!(bar.body.is_empty());

    let leaves = children(&parser, items[0]);
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].title, "Description");
    assert_eq!(leaves[0].tag(), KindTag::Text);
    assert_eq!(leaves[0].body, vec!["Does a thing."]);
    assert_eq!(leaves[0].origin.line, 3);

    assert_eq!(outcome.names, vec!["bar()"]);
    assert_eq!(outcome.entries.len(), 1);
    let entry = &outcome.entries[0];
    assert_eq!(entry.severity, Severity::Fail);
    assert_eq!((entry.file.as_str(), entry.line), ("foo.scad", 7));
    assert_eq!(
        entry.message,
        "Previous declaration of `bar()` at foo.scad:2, Redeclared: Function"
    );
}

#[test]
fn duplicate_function_keeps_first() {
    let (parser, outcome) = parse(
        "// LibFile: a.scad\n\
         // Function: foo()\n\
         //   First.\n\
         // Function: foo()\n\
         //   Second.\n",
    );
    assert_eq!(parser.indexed_names(), vec!["foo()"]);
    assert_eq!(item(&parser, "foo()").body, vec!["First."]);
    assert_eq!(item(&parser, "foo()").origin.line, 2);
    assert_eq!(outcome.entries.len(), 1);
    assert!(outcome.entries[0].message.contains("at test.scad:2"));

    let section = parser.document().node(outcome.root.unwrap()).children()[0];
    assert_eq!(parser.document().node(section).children().len(), 1);
}

#[test]
fn items_attach_to_open_subsection() {
    let (parser, outcome) = parse(
        "// LibFile: a.scad\n\
         // Section: Shapes\n\
         // Subsection: Round\n\
         // Module: ball()\n\
         // Section: Math\n\
         // Function: add()\n",
    );
    assert!(outcome.entries.is_empty());
    let doc = parser.document();
    let ball = item_id(&parser, "ball()");
    let sub = doc.node(ball).parent().unwrap();
    assert_eq!(doc.node(sub).tag(), KindTag::Subsection);
    assert_eq!(doc.node(sub).subtitle, "Round");

    let add = item_id(&parser, "add()");
    let math = doc.node(add).parent().unwrap();
    assert_eq!(doc.node(math).tag(), KindTag::Section);
    assert_eq!(doc.node(math).subtitle, "Math");
    assert_eq!(doc.file_of(add), outcome.root.unwrap());
}

#[test]
fn placeholder_file_and_anonymous_section() {
    let (parser, outcome) = parse_as("// Function: lonely()\n", "lonely.scad");
    let doc = parser.document();
    let file = doc.node(outcome.root.unwrap());
    assert_eq!(file.title, "LibFile");
    assert_eq!(file.subtitle, "lonely.scad");

    let section = doc.node(file.children()[0]);
    assert_eq!(section.title, "Section");
    assert_eq!(section.subtitle, "");
    assert_eq!(section.children(), &[item_id(&parser, "lonely()")]);
    assert!(outcome.entries.is_empty());
}

#[test]
fn second_file_block_fails() {
    let (parser, outcome) = parse("// File: a.scad\n// LibFile: b.scad\n");
    assert_eq!(
        messages(&outcome),
        vec!["File/LibFile block already specified, while declaring block: LibFile"]
    );
    assert_eq!(parser.document().files().len(), 1);
}

#[test]
fn subsection_requires_section() {
    let (parser, outcome) = parse("// LibFile: a.scad\n// Subsection: Things\n");
    assert_eq!(
        messages(&outcome),
        vec!["Must declare a Section before declaring block: Subsection"]
    );
    assert!(parser.document().node(outcome.root.unwrap()).children().is_empty());
}

#[test]
fn subsection_requires_subtitle() {
    let (_, outcome) = parse("// LibFile: a.scad\n// Section: S\n// Subsection:\n");
    assert_eq!(
        messages(&outcome),
        vec!["Must provide a subtitle when declaring block: Subsection"]
    );
}

#[test]
fn unrecognized_block_fails_and_scan_continues() {
    let (parser, outcome) = parse(
        "// LibFile: a.scad\n\
         // Bogus: thing\n\
         // Function: after()\n",
    );
    assert_eq!(messages(&outcome), vec!["Unrecognized block: Bogus"]);
    assert_eq!(outcome.entries[0].line, 2);
    assert!(parser.item("after()").is_some());
}

#[test]
fn under_indented_block_is_discarded() {
    let (parser, outcome) = parse(
        "// LibFile: a.scad\n\
         // Function: foo()\n\
         //     deep\n\
         //   shallow\n\
         // Function: bar()\n",
    );
    assert_eq!(
        messages(&outcome),
        vec!["Body line has less indentation than first line, while declaring block: Function"]
    );
    assert_eq!(outcome.entries[0].line, 2);
    assert_eq!(parser.indexed_names(), vec!["bar()"]);
}

// --- Leaves ---

#[test]
fn example_before_any_item_is_dropped() {
    let (parser, outcome) = parse(
        "// LibFile: a.scad\n\
         // Example: cube\n\
         //   cube(10);\n",
    );
    assert!(outcome.entries.is_empty());
    assert!(parser.document().node(outcome.root.unwrap()).children().is_empty());
    assert_eq!(parser.document().len(), 1);
}

#[test]
fn item_only_leaf_outside_item_is_ignored() {
    let (parser, outcome) = parse("// LibFile: a.scad\n// Description: top level\n");
    assert!(outcome.entries.is_empty());
    assert!(parser.document().node(outcome.root.unwrap()).children().is_empty());
}

#[test]
fn item_leaves_outside_item_are_dropped() {
    let (parser, outcome) = parse(
        "// LibFile: a.scad\n\
         // Topics: Shapes\n\
         // See Also: foo()\n\
         // Figure: pic\n\
         //   cube(1);\n",
    );
    assert!(outcome.entries.is_empty());
    assert!(parser.document().node(outcome.root.unwrap()).children().is_empty());
    assert_eq!(parser.document().len(), 1);
}

#[test]
fn defined_table_block() {
    let (parser, outcome) = parse(
        "// LibFile: a.scad\n\
         // DefineHeader(Table;Headers=A|B): MyTable\n\
         // MyTable: subtitle\n\
         //   x = 1\n\
         //   y = 2\n",
    );
    assert!(outcome.entries.is_empty());
    let nodes = children(&parser, outcome.root.unwrap());
    assert_eq!(nodes.len(), 1);
    let table = nodes[0];
    assert_eq!(table.tag(), KindTag::Table);
    assert_eq!(table.subtitle, "subtitle");
    assert_eq!(
        table.header_sets(),
        Some(&[vec!["A".to_string(), "B".to_string()]][..])
    );
    assert_eq!(table.body, vec!["x = 1", "y = 2"]);
    assert_eq!(
        table.tables(),
        Some(Ok(vec![Table {
            headers: vec!["A".to_string(), "B".to_string()],
            rows: vec![
                vec!["x".to_string(), "1".to_string()],
                vec!["y".to_string(), "2".to_string()],
            ],
        }]))
    );
}

#[test]
fn defined_table_without_file_opens_placeholder() {
    let (parser, outcome) = parse(
        "// DefineHeader(Table;Headers=A|B): MyTable\n\
         // MyTable:\n\
         //   x = 1\n\
         //   y = 2\n",
    );
    assert!(outcome.entries.is_empty());
    let file = parser.document().node(outcome.root.unwrap());
    assert_eq!(file.title, "LibFile");
    assert_eq!(file.subtitle, "test.scad");

    let nodes = children(&parser, outcome.root.unwrap());
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].tag(), KindTag::Table);
    let rows: Vec<Vec<String>> = nodes[0]
        .tables()
        .unwrap()
        .unwrap()
        .into_iter()
        .flat_map(|t| t.rows)
        .collect();
    assert_eq!(rows, vec![vec!["x", "1"], vec!["y", "2"]]);
}

#[test]
fn define_header_errors() {
    let (_, outcome) = parse(
        "// DefineHeader(Table): Broken\n\
         // DefineHeader(ItemOnly): Vague\n\
         // DefineHeader(Text):\n",
    );
    assert_eq!(
        messages(&outcome),
        vec![
            "Table type is missing Headers= option, while declaring block: DefineHeader",
            "Could not parse target block type, while declaring block: DefineHeader",
            "Must provide a subtitle when declaring block: DefineHeader",
        ]
    );
}

#[test]
fn arguments_split_into_tables() {
    let (parser, outcome) = parse(
        "// Function: foo()\n\
         // Arguments:\n\
         //   a = first\n\
         //   ---\n\
         //   b = second = really\n",
    );
    assert!(outcome.entries.is_empty());
    let args = parser
        .document()
        .children_titled(item_id(&parser, "foo()"), "Arguments")
        .next()
        .unwrap();
    let tables = args.tables().unwrap().unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].headers, vec!["By Position", "What it does"]);
    assert_eq!(tables[0].rows, vec![vec!["a", "first"]]);
    assert_eq!(tables[1].headers, vec!["By Name", "What it does"]);
    assert_eq!(tables[1].rows, vec![vec!["b", "second = really"]]);
}

#[test]
fn table_shape_errors() {
    let (parser, _) = parse(
        "// Function: foo()\n\
         // Arguments:\n\
         //   lonely\n\
         // Function: bar()\n\
         // Arguments:\n\
         //   a = 1\n\
         //   ---\n\
         //   b = 2\n\
         //   ---\n\
         //   c = 3\n",
    );
    let args_of = |name: &str| {
        parser
            .document()
            .children_titled(item_id(&parser, name), "Arguments")
            .next()
            .unwrap()
            .tables()
            .unwrap()
    };
    assert_eq!(
        args_of("foo()"),
        Err(DocsGenError::TooFewCells("Arguments".to_string()))
    );
    assert_eq!(
        args_of("bar()"),
        Err(DocsGenError::TooManyTables("Arguments".to_string()))
    );
}

#[test]
fn label_rejects_body() {
    let (parser, outcome) = parse(
        "// Function: foo()\n\
         // Status: stable\n\
         //   extra\n",
    );
    assert_eq!(
        messages(&outcome),
        vec!["Body not supported, while declaring block: Status"]
    );
    assert!(children(&parser, item_id(&parser, "foo()")).is_empty());
}

#[test]
fn text_subtitle_moves_into_body() {
    let (parser, outcome) = parse(
        "// LibFile: a.scad\n\
         // Text: hello\n\
         //   world\n",
    );
    let text = children(&parser, outcome.root.unwrap())[0];
    assert_eq!(text.tag(), KindTag::Text);
    assert_eq!(text.subtitle, "");
    assert_eq!(text.body, vec!["hello", "world"]);
}

#[test]
fn plural_examples() {
    let (parser, outcome) = parse(
        "// Module: foo()\n\
         // Examples(3D): Demo\n\
         //   foo(1);\n\
         //   foo(2);\n",
    );
    assert!(outcome.entries.is_empty());
    let examples = children(&parser, item_id(&parser, "foo()"));
    assert_eq!(examples.len(), 2);
    assert!(examples.iter().all(|e| e.title == "Example" && e.tag() == KindTag::Example));
    assert_eq!(examples[0].subtitle, "Demo");
    assert_eq!(examples[0].body, vec!["foo(1);"]);
    assert_eq!(examples[0].origin.line, 3);
    assert_eq!(examples[1].subtitle, "");
    assert_eq!(examples[1].body, vec!["foo(2);"]);
    assert_eq!(examples[1].origin.line, 4);
    assert!(examples[1].meta.has("3D"));
}

#[test]
fn plural_figures() {
    let (parser, outcome) = parse(
        "// Module: foo()\n\
         // Figures: a\n\
         //   foo(1);\n\
         //   foo(2);\n",
    );
    assert!(outcome.entries.is_empty());
    let figures = children(&parser, item_id(&parser, "foo()"));
    assert_eq!(figures.len(), 2);
    assert!(figures.iter().all(|f| f.title == "Figure" && f.tag() == KindTag::Figure));
    let subtitles: Vec<&str> = figures.iter().map(|f| f.subtitle.as_str()).collect();
    assert_eq!(subtitles, vec!["a", ""]);
    assert_eq!(figures[1].body, vec!["foo(2);"]);
}

#[test]
fn unrecognized_sub_heading_fails() {
    let (parser, outcome) = parse(
        "// Function: foo()\n\
         //   Intro text.\n\
         //   Bogus\n\
         //   -----\n\
         //   text\n",
    );
    assert_eq!(messages(&outcome), vec!["Unrecognized block: Bogus"]);
    assert_eq!(outcome.entries[0].line, 3);
    assert_eq!(item(&parser, "foo()").body, vec!["Intro text."]);
}

// --- Item hooks ---

#[test]
fn alias_resolves_to_item() {
    let (parser, outcome) = parse(
        "// LibFile: a.scad\n\
         // Function: foo()\n\
         // Alias: bar(), baz()\n",
    );
    assert!(outcome.entries.is_empty());
    let foo = item_id(&parser, "foo()");
    assert_eq!(parser.index().lookup("bar()"), Some(foo));
    assert_eq!(parser.index().lookup("baz()"), Some(foo));
    assert_eq!(
        item(&parser, "bar()").item_info().unwrap().aliases,
        vec!["bar()", "baz()"]
    );
    assert_eq!(outcome.names, vec!["foo()", "bar()", "baz()"]);
}

#[test]
fn alias_collision_fails() {
    let (parser, outcome) = parse(
        "// Function: foo()\n\
         // Function: bar()\n\
         // Aliases: foo()\n",
    );
    assert_eq!(
        messages(&outcome),
        vec!["Previous declaration of `foo()` at test.scad:1, Redeclared: Aliases"]
    );
    assert_eq!(parser.index().lookup("foo()"), Some(item_id(&parser, "foo()")));
    assert!(children(&parser, item_id(&parser, "bar()")).is_empty());
}

#[test]
fn status_topics_and_see_also() {
    let (parser, outcome) = parse(
        "// Function: old()\n\
         // Status: DEPRECATED, use new() instead\n\
         // Topics: Shapes, Math\n\
         // See Also: new(), other()\n",
    );
    assert!(outcome.entries.is_empty());
    let info = item(&parser, "old()").item_info().unwrap();
    assert!(info.deprecated);
    assert_eq!(info.topics, vec!["Shapes", "Math"]);
    assert_eq!(info.see_also, vec!["new()", "other()"]);
}

#[test]
fn item_name_rules() {
    let (parser, outcome) = parse("// Function: foo(x)\n// Function:\n");
    assert_eq!(
        messages(&outcome),
        vec![
            "Text between parentheses, while declaring block: Function",
            "Must provide a subtitle when declaring block: Function",
        ]
    );
    assert!(parser.index().is_empty());
}

#[test]
fn item_scope_closes_at_code() {
    let (parser, outcome) = parse(
        "// Function: foo()\n\
         function foo() = 1;\n\
         // Example: dropped\n\
         //   foo();\n",
    );
    assert!(outcome.entries.is_empty());
    assert!(children(&parser, item_id(&parser, "foo()")).is_empty());
}

// --- File metadata ---

#[test]
fn file_metadata_blocks() {
    let (parser, outcome) = parse(
        "// LibFile: a.scad\n\
         // FileSummary: Shapes and things\n\
         // FileGroup: Basics\n\
         // FileFootnotes: 1=first; 2=second\n\
         // Includes:\n\
         //   include <a.scad>\n\
         // CommonCode:\n\
         //   $fn = 32;\n",
    );
    assert!(outcome.entries.is_empty());
    let info = parser
        .document()
        .node(outcome.root.unwrap())
        .file_info()
        .unwrap()
        .clone();
    assert_eq!(info.summary, "Shapes and things");
    assert_eq!(info.group, "Basics");
    assert_eq!(
        info.footnotes,
        vec![
            ("1".to_string(), "first".to_string()),
            ("2".to_string(), "second".to_string()),
        ]
    );
    assert_eq!(info.includes, vec!["include <a.scad>"]);
    assert_eq!(info.common_code, vec!["$fn = 32;"]);
}

#[test]
fn footnote_without_note_warns() {
    let (parser, outcome) = parse("// LibFile: a.scad\n// FileFootnotes: 1=first;2\n");
    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.entries[0].severity, Severity::Warning);
    assert!(outcome.entries[0].message.starts_with("Footnote `2` has no note text"));
    assert!(!outcome.has_errors());
    let info = parser.document().node(outcome.root.unwrap()).file_info().unwrap();
    assert_eq!(info.footnotes[1], ("2".to_string(), String::new()));
}

#[test]
fn file_summary_requires_subtitle() {
    let (_, outcome) = parse("// LibFile: a.scad\n// FileSummary:\n");
    assert_eq!(
        messages(&outcome),
        vec!["Must provide a subtitle when declaring block: FileSummary"]
    );
}

// --- Configuration ---

#[test]
fn config_directives_outside_config_fail() {
    let (parser, outcome) = parse(
        "// IgnoreFiles: tmp.scad\n\
         // ProjectName: Nope\n",
    );
    assert_eq!(
        messages(&outcome),
        vec![
            "Block disallowed outside of .docsgen_rc file: IgnoreFiles",
            "Block disallowed outside of .docsgen_rc file: ProjectName",
        ]
    );
    assert!(parser.docs_options().ignored_patterns.is_empty());
    assert_eq!(parser.docs_options().project_name, None);
}

#[test]
fn load_config_fills_docs_options() {
    let mut parser = DocsParser::default();
    let outcome = parser.load_config(
        "IgnoreFiles:\n  tmp/*.scad\n  scratch.scad\n\
         PrioritizeFiles: core.scad\n\
         DocsDirectory: docs/\n\
         ProjectName: Shapes Library\n\
         TargetProfile: githubwiki\n\
         GenerateDocs: Files, TOC, Cheat, files\n",
    );
    assert!(outcome.entries.is_empty(), "{:?}", outcome.entries);
    assert_eq!(outcome.root, None);

    let docs = parser.docs_options();
    assert!(docs.is_ignored("tmp/x.scad"));
    assert!(docs.is_ignored("scratch.scad"));
    assert!(!docs.is_ignored("core.scad"));
    assert_eq!(docs.priority_files, vec!["core.scad"]);
    assert_eq!(docs.docs_dir.as_deref(), Some("docs"));
    assert_eq!(docs.project_name.as_deref(), Some("Shapes Library"));
    assert_eq!(docs.target_profile.as_deref(), Some("githubwiki"));
    assert_eq!(docs.generate, vec![DocKind::Files, DocKind::Toc, DocKind::CheatSheet]);
}

#[test]
fn config_directive_errors() {
    let mut parser = DocsParser::default();
    let outcome = parser.load_config(
        "GenerateDocs: Files, Bogus\n\
         DocsDirectory: docs\n  extra\n\
         IgnoreFiles: [\n",
    );
    assert_eq!(
        messages(&outcome),
        vec![
            "Unknown type \"Bogus\", while declaring block: GenerateDocs",
            "Body not supported, while declaring block: DocsDirectory",
            "Invalid file pattern \"[\", while declaring block: IgnoreFiles",
        ]
    );
    assert!(parser.docs_options().generate.is_empty());
    assert_eq!(parser.docs_options().docs_dir, None);
}

#[test]
fn custom_config_source_name() {
    let mut parser = DocsParser::new(ParserOptions {
        config_source: "project.rc".to_string(),
        ..ParserOptions::default()
    });
    let outcome = parser.load_config("ProjectName: Custom\n");
    assert!(outcome.entries.is_empty());
    assert_eq!(parser.docs_options().project_name.as_deref(), Some("Custom"));
    assert_eq!(parser.log().len(), 0);
}

#[test]
fn strict_mode_requires_file_first() {
    let mut parser = DocsParser::new(ParserOptions {
        strict: true,
        ..ParserOptions::default()
    });
    let outcome = parser.parse_source(
        "// Section: Early\n\
         // LibFile: a.scad\n\
         // Section: Late\n",
        "a.scad",
    );
    assert_eq!(
        messages(&outcome),
        vec!["Must declare File or LibFile block before declaring block: Section"]
    );
    let sections = children(&parser, outcome.root.unwrap());
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].subtitle, "Late");
}

// --- Across units ---

#[test]
fn outcomes_report_per_unit_deltas() {
    let mut parser = DocsParser::default();
    let first = parser.parse_source("// Function: a()\n// Bogus:\n", "a.scad");
    let second = parser.parse_source("// Function: b()\n// Function: a()\n", "b.scad");

    assert_eq!(first.names, vec!["a()"]);
    assert_eq!(second.names, vec!["b()"]);
    assert_eq!(messages(&first), vec!["Unrecognized block: Bogus"]);
    assert_eq!(
        messages(&second),
        vec!["Previous declaration of `a()` at a.scad:1, Redeclared: Function"]
    );
    assert_eq!(parser.log().len(), 2);
    assert!(parser.log().file_has_errors("b.scad"));
    assert_eq!(parser.document().files().len(), 2);
}

#[test]
fn names_sort_case_insensitively() {
    let (parser, _) = parse(
        "// Function: beta()\n\
         // Function: Alpha()\n\
         // Function: alpha()\n\
         // Constant: GAMMA\n",
    );
    assert_eq!(
        parser.indexed_names(),
        vec!["Alpha()", "alpha()", "beta()", "GAMMA"]
    );
}

#[test]
fn prioritized_files_come_first() {
    let mut parser = DocsParser::default();
    parser.load_config("PrioritizeFiles: c.scad\n  b.scad\n");
    let a = parser.parse_source("// LibFile: a.scad\n", "a.scad").root.unwrap();
    let b = parser.parse_source("// LibFile: b.scad\n", "b.scad").root.unwrap();
    let c = parser.parse_source("// LibFile: c.scad\n", "c.scad").root.unwrap();
    assert_eq!(parser.docs_options().priority_files, vec!["c.scad", "b.scad"]);
    assert_eq!(parser.files_prioritized(), vec![c, b, a]);
}

// --- Output views ---

#[test]
fn tree_dump() {
    let (parser, _) = parse(
        "// LibFile: a.scad\n\
         // Section: Shapes\n\
         // Function: foo()\n\
         //   Makes a shape.\n",
    );
    assert_eq!(
        parser.dump_full_tree(),
        "LibFile: a.scad\n  Section: Shapes\n    Function: foo()\n      Makes a shape.\n"
    );
}

#[test]
fn indexed_data_folds_item_children() {
    let (parser, _) = parse(
        "// LibFile: a.scad\n\
         // Function: foo()\n\
         // Alias: bar()\n\
         // Usage:\n\
         //   foo(x);\n\
         // Description:\n\
         //   Does things.\n\
         // Arguments:\n\
         //   x = the value\n\
         // Example: Basic\n\
         //   foo(1);\n",
    );
    let data = parser.indexed_data("bar()").unwrap();
    assert_eq!(data.name, "Function");
    assert_eq!(data.subtitle, "foo()");
    assert_eq!((data.file.as_str(), data.line), ("test.scad", 2));
    assert_eq!(data.deprecated, Some(false));
    assert_eq!(data.aliases, vec!["bar()"]);
    assert_eq!(
        data.usages,
        vec![UsageData {
            subtitle: String::new(),
            body: vec!["foo(x);".to_string()],
        }]
    );
    assert_eq!(data.description, vec!["Does things."]);
    assert_eq!(data.arguments, vec!["x = the value"]);
    assert_eq!(data.examples, vec![vec!["foo(1);".to_string()]]);
    assert!(data.children.is_empty());

    let all = parser.all_data();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].subtitle, "a.scad");
    assert_eq!(all[0].children.len(), 1);
}
