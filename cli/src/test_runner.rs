use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use docsgen::{DocsParser, LogEntry, ParserOptions};

const FIXTURE_SUFFIX: &str = ".test.txt";

#[derive(Debug, Deserialize)]
pub struct ExpectedError {
    /// Substring that must appear in the log message.
    pub contains: String,

    /// If set, the entry must be reported on this 1-based source line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Source identifier the fixture is parsed under.
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// Parse in strict mode.
    #[serde(default)]
    pub strict: bool,

    /// Expected indexed names, compared against the sorted index.
    #[serde(default)]
    pub expect_items: Option<Vec<String>>,

    /// Expected log entries. If present (even empty), every entry is checked in order.
    #[serde(default)]
    pub expect_errors: Option<Vec<ExpectedError>>,

    /// Expected tree dump (trimmed comparison).
    #[serde(default)]
    pub expect_tree: Option<String>,
}

fn default_source_name() -> String {
    "input.scad".to_string()
}

/// Parse a `.test.txt` file into its TOML config and documented source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let source = after_open[rest_start..]
        .strip_prefix("\r\n")
        .or_else(|| after_open[rest_start..].strip_prefix('\n'))
        .unwrap_or(&after_open[rest_start..]);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn run_single_test(path: &Path) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };
    let description = config.description.clone();

    let mut parser = DocsParser::new(ParserOptions {
        strict: config.strict,
        ..ParserOptions::default()
    });
    parser.parse_source(source, &config.source_name);

    if let Some(expected) = &config.expect_errors {
        if let Some(reason) = check_errors(parser.log().entries(), expected) {
            return fail(description, reason);
        }
    }

    if let Some(expected) = &config.expect_items {
        let actual = parser.indexed_names();
        if actual != *expected {
            return fail(
                description,
                format!(
                    "item mismatch\n  expected: {}\n  actual:   {}",
                    expected.join(", "),
                    actual.join(", ")
                ),
            );
        }
    }

    if let Some(expected) = &config.expect_tree {
        let dump = parser.dump_full_tree();
        let (actual, expected) = (dump.trim(), expected.trim());
        if actual != expected {
            return fail(
                description,
                format!(
                    "tree mismatch\n  expected:\n{}\n  actual:\n{}",
                    indent(expected),
                    indent(actual)
                ),
            );
        }
    }

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Pass,
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check that logged entries match expectations. Returns `Some(reason)` on mismatch.
fn check_errors(entries: &[LogEntry], expected: &[ExpectedError]) -> Option<String> {
    if entries.len() != expected.len() {
        let actual_msgs: Vec<String> = entries.iter().map(|e| format!("  - {}", e)).collect();
        return Some(format!(
            "expected {} log entr(ies), got {}\n  actual entries:\n{}",
            expected.len(),
            entries.len(),
            if actual_msgs.is_empty() {
                "    (none)".to_string()
            } else {
                actual_msgs.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in entries.iter().zip(expected.iter()).enumerate() {
        if !actual.message.contains(&expected.contains) {
            return Some(format!(
                "entry[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, actual
            ));
        }

        if let Some(expected_line) = expected.line {
            if actual.line != expected_line {
                return Some(format!(
                    "entry[{}]: expected on line {}, but reported on line {}",
                    i, expected_line, actual.line
                ));
            }
        }
    }

    None
}

const GREEN: &str = "32";
const RED: &str = "31";
const BOLD: &str = "1";

fn paint(text: &str, code: &str, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

fn label_of(result: &TestResult) -> &str {
    result.description.as_deref().unwrap_or_else(|| {
        result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|s| s.trim_end_matches(FIXTURE_SUFFIX))
            .unwrap_or("?")
    })
}

/// Fixtures under `root` keyed by folder relative to `root` ("" for the
/// top level). A fixture file given directly is its own single entry.
fn discover(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    if root.is_file() {
        categories.insert(String::new(), vec![root.to_path_buf()]);
        return categories;
    }

    let pattern = format!(
        "{}/**/*{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        FIXTURE_SUFFIX
    );
    let Ok(paths) = glob::glob(&pattern) else {
        return categories;
    };
    for path in paths.flatten() {
        let category = path
            .parent()
            .and_then(|dir| dir.strip_prefix(root).ok())
            .map(|dir| dir.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        categories.entry(category).or_default().push(path);
    }
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

/// `name` selects its own folder and everything below it.
fn in_category(category: &str, name: &str) -> bool {
    category == name
        || category
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn select(
    mut categories: BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<String, Vec<PathBuf>> {
    if requested.is_empty() {
        return categories;
    }
    let wanted: Vec<&str> = requested.iter().map(|r| r.trim_matches('/')).collect();
    for name in &wanted {
        if !categories.keys().any(|c| in_category(c, name)) {
            eprintln!("warning: category '{}' not found", name);
        }
    }
    categories.retain(|category, _| wanted.iter().any(|name| in_category(category, name)));
    categories
}

/// Print the categories found under `path` with their fixture counts.
pub fn list_categories(path: &Path) {
    let categories = discover(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return;
    }
    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} tests)", category_label(category), files.len());
    }
}

/// Run every selected fixture under `path`. Returns the process exit code.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let selected = if path.is_file() {
        discover(path)
    } else {
        select(discover(path), categories)
    };
    if selected.is_empty() {
        eprintln!("no matching {} files found in {}", FIXTURE_SUFFIX, path.display());
        return 1;
    }

    let mut passed = 0;
    let mut failures = Vec::new();
    for (category, files) in &selected {
        eprintln!();
        eprintln!("{}", paint(category_label(category), BOLD, no_color));
        for file in files {
            let result = run_single_test(file);
            let (status, code) = match result.outcome {
                TestOutcome::Pass => ("PASS", GREEN),
                TestOutcome::Fail(_) => ("FAIL", RED),
            };
            eprintln!("  {}  {}", paint(status, code, no_color), label_of(&result));
            if matches!(result.outcome, TestOutcome::Pass) {
                passed += 1;
            } else {
                failures.push(result);
            }
        }
    }
    report(passed, &failures, no_color)
}

fn report(passed: usize, failures: &[TestResult], no_color: bool) -> i32 {
    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
    }
    for result in failures {
        if let TestOutcome::Fail(reason) = &result.outcome {
            eprintln!();
            eprintln!("  {} ({})", label_of(result), result.path.display());
            eprintln!("{}", indent(reason));
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!("test result: {}. {} passed, 0 failed", paint("ok", GREEN, no_color), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed",
            paint("FAILED", RED, no_color),
            passed,
            failures.len()
        );
        1
    }
}
