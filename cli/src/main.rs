mod test_runner;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;

use docsgen::config::CONFIG_FILE;
use docsgen::{DocsParser, LogEntry, ParserOptions};

#[derive(Parser)]
#[command(name = "docsgen", version, about = "Documentation comment parser")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse source files and report documentation errors
    Parse(ParseArgs),

    /// Run .test.txt fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct ParseArgs {
    /// Source files to parse, in order
    #[arg(required = true)]
    files: Vec<String>,

    /// Configuration file (defaults to ./.docsgen_rc when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Require a File or LibFile block before any other block
    #[arg(long)]
    strict: bool,

    /// Parse only, print nothing but diagnostics (exit 0 if clean)
    #[arg(long)]
    check: bool,

    /// Dump the parsed tree
    #[arg(long)]
    tree: bool,

    /// Print the parsed files as JSON
    #[arg(long)]
    json: bool,

    /// List every indexed item name
    #[arg(long)]
    list_items: bool,

    /// Suppress warnings (failures are still reported)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.txt file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

#[derive(Debug, Error)]
enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Parse(parse_args) => do_parse(parse_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

/// Install a stderr subscriber, but only when `RUST_LOG` asks for one.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .try_init();
    }
}

/// Read the configuration text, if any.
///
/// An explicit `--config` path must exist; the default file is optional.
fn read_config(explicit: Option<&Path>) -> Result<Option<(PathBuf, String)>, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(CONFIG_FILE);
            if !default.is_file() {
                return Ok(None);
            }
            default
        }
    };
    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    Ok(Some((path, text)))
}

fn do_parse(args: ParseArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let mut files = SimpleFiles::new();
    let mut file_ids: HashMap<String, usize> = HashMap::new();

    let mut parser = DocsParser::new(ParserOptions {
        strict: args.strict,
        ..ParserOptions::default()
    });

    match read_config(args.config.as_deref()) {
        Ok(Some((path, text))) => {
            tracing::debug!(path = %path.display(), "loading config");
            let source = parser.options().config_source.clone();
            file_ids.insert(source.clone(), files.add(source, text.clone()));
            parser.load_config(&text);
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }

    let mut parsed = 0usize;
    for file in &args.files {
        if parser.docs_options().is_ignored(file) {
            tracing::debug!(file = file.as_str(), "ignored by config");
            continue;
        }
        let source = match std::fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", file, e);
                process::exit(1);
            }
        };
        file_ids.insert(file.clone(), files.add(file.clone(), source.clone()));
        parser.parse_source(&source, file);
        parsed += 1;
    }

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for entry in parser.log().entries() {
        if args.quiet && !entry.is_failure() {
            continue;
        }
        emit_entry(&writer, &config, &files, &file_ids, entry);
    }
    let failed = parser.log().has_errors();

    if args.check {
        if !failed {
            eprintln!("ok: {} file(s) parsed successfully", parsed);
        }
    } else if args.tree {
        print!("{}", parser.dump_full_tree());
    } else if args.json {
        match serde_json::to_string_pretty(&parser.all_data()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: cannot serialize parsed data: {}", e);
                process::exit(1);
            }
        }
    } else if args.list_items {
        for name in parser.indexed_names() {
            println!("{}", name);
        }
    }

    if failed {
        process::exit(1);
    }
}

/// Render one log entry as a diagnostic pointing at its source line, or as a
/// plain line when the source is not registered.
fn emit_entry(
    writer: &StandardStream,
    config: &term::Config,
    files: &SimpleFiles<String, String>,
    file_ids: &HashMap<String, usize>,
    entry: &LogEntry,
) {
    let span = file_ids.get(&entry.file).and_then(|id| {
        files
            .line_range(*id, entry.line.saturating_sub(1))
            .ok()
            .map(|range| (*id, range))
    });
    match span {
        Some((file_id, range)) => {
            let diagnostic = entry.to_diagnostic(file_id, range);
            let _ = term::emit_to_write_style(&mut writer.lock(), config, files, &diagnostic);
        }
        None => eprintln!("{}", entry),
    }
}
