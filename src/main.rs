//! iso639: load, query and export the ISO 639-3 language code registry.

use clap::{Parser, Subcommand};
use iso639_core::{
    export_all, load_dataset, Dataset, ExportFormat, ExportOptions, LanguageRecord, LoadOptions,
    ValidationMode,
};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "iso639")]
#[command(version)]
#[command(about = "Validate, query and export the ISO 639-3 language code table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the registry and run a few sample lookups
    Demo {
        /// Registry XML file
        #[arg(value_name = "FILE")]
        source: PathBuf,
    },

    /// Look up a language by code (639-3, 639-1 or 639-2) or by name
    Lookup {
        /// Registry XML file
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Code or reference name to search for
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Check the registry file and report problems
    Validate {
        /// Registry XML file
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// List every invalid entry instead of stopping at the first
        #[arg(short, long)]
        report: bool,
    },

    /// Write the generated tables
    Export {
        /// Registry XML file
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Output file name without extension
        #[arg(short, long, default_value = "iso_639_3_tables")]
        stem: String,

        /// Formats to write (rust, json, yaml); all when omitted
        #[arg(short, long = "format", value_delimiter = ',')]
        formats: Vec<String>,

        /// List every invalid entry instead of stopping at the first
        #[arg(short, long)]
        report: bool,
    },
}

fn load_options(report: bool) -> LoadOptions {
    LoadOptions {
        mode: if report {
            ValidationMode::Report
        } else {
            ValidationMode::Strict
        },
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { source } => {
            let dataset = load_dataset(&source, LoadOptions::default())?;
            demo(&dataset);
        }
        Commands::Lookup { source, query } => {
            let dataset = load_dataset(&source, LoadOptions::default())?;
            let found = lookup(&dataset, &query);
            if found.is_empty() {
                println!("No language matches `{query}`");
            }
            for record in found {
                println!("{record}");
            }
        }
        Commands::Validate { source, report } => {
            let dataset = load_dataset(&source, load_options(report))?;
            println!("{dataset}: OK");
            for (name, codes) in dataset.shared_names() {
                println!("  note: `{name}` is shared by {}", codes.join(", "));
            }
        }
        Commands::Export {
            source,
            out_dir,
            stem,
            formats,
            report,
        } => {
            let dataset = load_dataset(&source, load_options(report))?;
            let formats = if formats.is_empty() {
                ExportFormat::ALL.to_vec()
            } else {
                formats
                    .iter()
                    .map(|f| f.parse::<ExportFormat>())
                    .collect::<Result<Vec<_>, _>>()?
            };
            std::fs::create_dir_all(&out_dir).into_diagnostic()?;
            let options = ExportOptions {
                out_dir,
                stem,
                formats,
            };
            for path in export_all(&dataset, &options)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// Tries every index in turn: 639-3 code, 639-1 code, 639-2 code, then name.
fn lookup<'d>(dataset: &'d Dataset, query: &str) -> Vec<&'d LanguageRecord> {
    let query = query.trim();
    if let Some(record) = dataset.lookup_by_code(&query.to_ascii_lowercase()) {
        return vec![record];
    }
    if let Some(record) = dataset.lookup_by_part1(&query.to_ascii_lowercase()) {
        return vec![record];
    }
    if let Some(record) = dataset.lookup_by_part2(&query.to_ascii_lowercase()) {
        return vec![record];
    }
    dataset.lookup_by_name_ignore_case(query)
}

fn demo(dataset: &Dataset) {
    println!("{dataset}");
    for code in ["eng", "fra", "deu", "zho", "xyz"] {
        match dataset.lookup_by_code(code) {
            Some(record) => println!("  {code} -> {record}"),
            None => println!("  {code} -> not found"),
        }
    }
    for name in ["English", "Chinese"] {
        let codes: Vec<_> = dataset
            .lookup_by_name(name)
            .into_iter()
            .map(|r| r.code.as_str())
            .collect();
        println!("  {name:?} -> [{}]", codes.join(", "));
    }
    println!("  exists(\"mul\") = {}", dataset.exists("mul"));
}
