//! Command-line interface definition.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::kmer::{CountMode, MaxK};

/// Find all k-mers of length 1..=K in the .fasta files of a directory.
#[derive(Parser, Debug)]
#[command(name = "findkmers")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// Max. length of k-mers; all lengths 1..=K are counted (clamped to 1-8)
    #[arg(
        short = 'k',
        long = "max-k",
        default_value = "4",
        value_parser = parse_max_k,
        allow_negative_numbers = true
    )]
    pub max_k: MaxK,

    /// Directory holding the .fasta files [default: current directory]
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Write one combined table for all input files under this name
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write one table per input file, resetting counts between files (overrides --output)
    #[arg(short = 's', long)]
    pub per_file: bool,

    /// Count occurrences per start offset instead of a single total
    #[arg(short, long)]
    pub positional: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tsv")]
    pub format: OutputFormat,

    /// Suppress progress and summary output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Counting mode selected by `--positional`.
    pub const fn count_mode(&self) -> CountMode {
        if self.positional {
            CountMode::Positional
        } else {
            CountMode::Aggregate
        }
    }
}

/// Output format for k-mer tables.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-separated values (kmer\tcount[\tcount...])
    #[default]
    Tsv,
    /// JSON array format
    Json,
}

fn parse_max_k(s: &str) -> Result<MaxK, String> {
    let k: i64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    Ok(MaxK::clamped(k))
}
