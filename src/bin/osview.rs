//! osview: OpenSearch index mapping viewer
//!
//! # Usage
//!
//! ```bash
//! # List the indexes in an export
//! osview list indexes.json
//!
//! # Full report for one index, with a field search
//! osview view indexes.json --index products --search '^price'
//!
//! # Compare two indexes
//! osview compare indexes.json products-v1 products-v2
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use osview::prelude::*;
use osview::render::{self, IndexOverview, TreeOptions};
use osview::search::ancestor_paths;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "osview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "🗂️  Clear, readable views of OpenSearch index mappings", long_about = None)]
#[command(after_help = "EXAMPLES:
    osview list indexes.json
    osview view indexes.json -i products -s 'name|title'
    osview view indexes.json -i products --export products.summary.json
    osview compare indexes.json products-v1 products-v2")]
struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (defaults to ./osview.toml)
    #[arg(long, global = true, env = "OSVIEW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all indexes in the JSON file
    #[command(alias = "list-indexes")]
    List {
        /// Path to JSON file containing index data
        file: PathBuf,
    },
    /// View index mappings in a clean, readable format
    View {
        /// Path to JSON file containing index data
        file: PathBuf,
        /// Specific index to analyze (default: all)
        #[arg(short, long)]
        index: Option<String>,
        /// Regex search pattern for field names and paths
        #[arg(short, long)]
        search: Option<String>,
        /// Export a clean summary to JSON
        #[arg(short, long)]
        export: Option<PathBuf>,
        /// Hide the field tree
        #[arg(long)]
        no_tree: bool,
        /// Hide the field types summary
        #[arg(long)]
        no_summary: bool,
        /// Hide the analyzers table
        #[arg(long)]
        no_analyzers: bool,
        /// Deepest tree level to draw
        #[arg(long)]
        max_depth: Option<usize>,
        /// Which fields count towards type percentages
        #[arg(long, value_enum)]
        scope: Option<CliScope>,
    },
    /// Compare two indexes side by side
    Compare {
        /// Path to JSON file containing index data
        file: PathBuf,
        /// First index to compare
        index1: String,
        /// Second index to compare
        index2: String,
        /// Settings key to leave out of the diff (repeatable)
        #[arg(long = "ignore-setting")]
        ignore_settings: Vec<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum CliScope {
    All,
    TopLevel,
}

impl From<CliScope> for SummaryScope {
    fn from(val: CliScope) -> Self {
        match val {
            CliScope::All => SummaryScope::All,
            CliScope::TopLevel => SummaryScope::TopLevel,
        }
    }
}

struct ViewArgs<'a> {
    index: Option<&'a str>,
    search: Option<&'a str>,
    export: Option<&'a Path>,
    show_tree: bool,
    show_summary: bool,
    show_analyzers: bool,
    max_depth: Option<usize>,
    scope: SummaryScope,
    examples: usize,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("osview=debug")
    } else {
        EnvFilter::try_from_env("OSVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = ViewerConfig::load(cli.config.as_deref())?;
    if cli.no_color || !config.display.color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Commands::List { file } => list_indexes(file),
        Commands::View {
            file,
            index,
            search,
            export,
            no_tree,
            no_summary,
            no_analyzers,
            max_depth,
            scope,
        } => view(
            file,
            &ViewArgs {
                index: index.as_deref(),
                search: search.as_deref(),
                export: export.as_deref(),
                show_tree: !no_tree,
                show_summary: !no_summary,
                show_analyzers: !no_analyzers,
                max_depth: max_depth.or(config.display.max_depth),
                scope: scope
                    .clone()
                    .map(SummaryScope::from)
                    .unwrap_or(config.summary.scope),
                examples: config.display.examples,
            },
        ),
        Commands::Compare {
            file,
            index1,
            index2,
            ignore_settings,
        } => {
            let mut ignore = config.compare.ignore_settings.clone();
            ignore.extend(ignore_settings.iter().cloned());
            compare(
                file,
                (index1.as_str(), index2.as_str()),
                &CompareOptions {
                    ignore_settings: ignore,
                },
                (config.summary.scope, config.display.examples),
            )
        }
    }
}

fn list_indexes(file: &Path) -> Result<()> {
    let set = osview::load(file)?;
    print!("{}", render::index_list(&set.names()));
    Ok(())
}

fn view(file: &Path, args: &ViewArgs<'_>) -> Result<()> {
    let set = osview::load(file)?;

    // Resolve everything that can fail before printing anything.
    let docs: Vec<&IndexDocument> = match args.index {
        Some(name) => vec![set.get(name)?],
        None => set.iter().collect(),
    };
    let pattern = args.search.map(FieldPattern::new).transpose()?;

    if docs.is_empty() {
        println!("{}", "No indexes found in the data".yellow());
        return Ok(());
    }

    let mut exports = Vec::new();
    for doc in docs {
        let fields = doc.fields();

        println!();
        println!("{}", render::rule(&doc.name));
        println!();
        print!("{}", render::overview(&IndexOverview::new(doc, &fields)));
        println!();

        let hits = match &pattern {
            Some(pattern) => {
                let hits = search_fields(&fields, pattern)?;
                print!("{}", render::search_table(&doc.name, pattern.as_str(), &hits));
                println!();
                Some(hits)
            }
            None => None,
        };

        if args.show_summary {
            let summary = summarize_types(&fields, args.scope, args.examples);
            print!("{}", render::type_summary_table(&doc.name, &summary));
            println!();
        }

        if args.show_analyzers {
            let analyzers = summarize_analyzers(&fields, &doc.settings);
            print!("{}", render::analyzer_table(&doc.name, &analyzers));
            println!();
        }

        if args.show_tree {
            let visible = hits.as_ref().map(|h| ancestor_paths(&fields, h));
            let options = TreeOptions {
                max_depth: args.max_depth,
                visible: visible.as_ref(),
            };
            print!("{}", render::field_tree(&doc.name, &fields, &options));
            println!();
        }

        if args.export.is_some() {
            exports.push(IndexExport::build(doc, args.scope, args.examples));
        }
    }

    if let Some(path) = args.export {
        write_exports(&exports, path)?;
        println!(
            "{} Exported readable summary to: {}",
            "✅".green(),
            path.display().to_string().cyan()
        );
    }

    Ok(())
}

fn compare(
    file: &Path,
    (a, b): (&str, &str),
    options: &CompareOptions,
    (scope, examples): (SummaryScope, usize),
) -> Result<()> {
    let set = osview::load(file)?;
    let result = compare_indexes(&set, a, b, options)?;

    let (doc_a, doc_b) = (set.get(a)?, set.get(b)?);
    let (fields_a, fields_b) = (doc_a.fields(), doc_b.fields());
    let overviews = (
        IndexOverview::new(doc_a, &fields_a),
        IndexOverview::new(doc_b, &fields_b),
    );
    let summaries = (
        summarize_types(&fields_a, scope, examples),
        summarize_types(&fields_b, scope, examples),
    );

    print!(
        "{}",
        render::comparison(
            &result,
            (&overviews.0, &overviews.1),
            (&summaries.0, &summaries.1)
        )
    );
    Ok(())
}
