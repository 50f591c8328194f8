//! aivdm-extract CLI - AIS message layout extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use aivdm_extract::{render, Extractor, JsonFormat};

const DEFAULT_INPUT: &str = "AIVDM.txt";

#[derive(Parser)]
#[command(name = "aivdm-extract")]
#[command(version)]
#[command(about = "Extract AIS message bit layouts from the AIVDM protocol description", long_about = None)]
struct Cli {
    /// Input document (AIVDM.txt if not specified)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the message catalog as JSON
    Extract {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Print a readable listing instead of JSON
        #[arg(long, conflicts_with = "compact")]
        text: bool,

        /// Skip tables that fail to normalize instead of aborting
        #[arg(long)]
        lenient: bool,

        /// Also collect code lookup tables
        #[arg(long)]
        lookups: bool,

        /// Drop `?` placeholder rows from layout tables
        #[arg(long)]
        skip_placeholders: bool,

        /// Regex selecting message section titles (needs an `ids` group)
        #[arg(long, value_name = "RE", env = "AIVDM_TITLE_PATTERN")]
        title_pattern: Option<String>,
    },

    /// List every table with its resolved title
    Tables {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Normalize the first table whose title matches a pattern
    Table {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Regex matched against resolved table titles
        #[arg(long, value_name = "RE")]
        title: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            compact,
            text,
            lenient,
            lookups,
            skip_placeholders,
            title_pattern,
        }) => cmd_extract(
            &input,
            output.as_deref(),
            ExtractFlags {
                compact,
                text,
                lenient,
                lookups,
                skip_placeholders,
            },
            title_pattern,
        ),
        Some(Commands::Tables { input }) => cmd_tables(&input),
        Some(Commands::Table {
            input,
            title,
            output,
            compact,
        }) => cmd_table(&input, &title, output.as_deref(), compact),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            let input = cli.input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
            if input.exists() {
                cmd_extract(&input, None, ExtractFlags::default(), None)
            } else {
                println!("{}", format!("{} not found", input.display()).yellow());
                println!("Usage: aivdm-extract [FILE]");
                println!("       aivdm-extract --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Output and behaviour switches of `extract`.
#[derive(Default)]
struct ExtractFlags {
    compact: bool,
    text: bool,
    lenient: bool,
    lookups: bool,
    skip_placeholders: bool,
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    flags: ExtractFlags,
    title_pattern: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut extractor = Extractor::new();
    if flags.lenient {
        extractor = extractor.lenient();
    }
    if flags.lookups {
        extractor = extractor.with_lookups();
    }
    if flags.skip_placeholders {
        extractor = extractor.skip_placeholder_rows();
    }
    if let Some(pattern) = title_pattern {
        extractor = extractor.with_title_pattern(pattern);
    }

    let catalog = extractor.read(input)?.catalog()?;
    log::info!("extracted {} message types from {}", catalog.len(), input.display());

    let content = if flags.text {
        render::to_text(&catalog)
    } else {
        render::to_json(&catalog, json_format(flags.compact))?
    };

    write_output(output, &content)
}

fn cmd_tables(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Lenient reading: listing should still work on a partly broken document
    let result = Extractor::new().lenient().read(input)?;
    let tables = result.tables();

    println!("{}", "Tables".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());

    for located in &tables {
        let title = located.title.as_deref().unwrap_or("(untitled)");
        let shape = format!(
            "{} cols x {} rows",
            located.table.column_count(),
            located.table.row_count()
        );
        println!(
            "{:>4}  {}  {}",
            located.index.to_string().bold(),
            title,
            shape.dimmed()
        );
    }

    println!("\n{} {} tables", "Found".green().bold(), tables.len());

    Ok(())
}

fn cmd_table(
    input: &Path,
    title: &str,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = Extractor::new().read(input)?;
    let structure = result.table(title)?;
    let json = render::value_to_json(&structure, json_format(compact))?;
    write_output(output, &json)
}

fn cmd_version() {
    println!("{} {}", "aivdm-extract".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("AIS message layout extraction tool");
    println!();
    println!("License: MIT");
}
