//! Error types for findkmers.
//!
//! Directory and output failures end a run; per-file failures are reported
//! and the run moves on to the next input.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in findkmers operations.
#[derive(Debug, Error)]
pub enum FindKmersError {
    /// The input directory could not be opened or listed.
    #[error("directory '{path}' not found: {source}")]
    DirectoryNotFound {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// The directory holds no entry whose name contains `.fasta`.
    #[error("no .fasta files found in '{path}'")]
    NoInputFiles { path: PathBuf },

    /// Failed to open an input file.
    #[error("failed to open input file '{path}': {source}")]
    FileOpen {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed part-way through reading an input file.
    #[error("failed to read input file '{path}': {source}")]
    FileRead {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to create or write an output table.
    #[error("failed to write output '{path}': {source}")]
    OutputWrite {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// A line of a TSV table could not be parsed back.
    #[error("malformed table line {line}: {details}")]
    MalformedTable { line: usize, details: String },
}

/// Error for a k-mer length bound outside the supported range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("maximum k-mer length {k} is out of range: must be between {min} and {max}")]
pub struct MaxKError {
    /// The rejected value.
    pub k: usize,
    /// Smallest accepted bound.
    pub min: usize,
    /// Largest accepted bound.
    pub max: usize,
}

impl FindKmersError {
    /// Returns `true` for errors scoped to a single input file.
    ///
    /// The directory runner logs these and continues with the next file.
    pub const fn is_per_file(&self) -> bool {
        matches!(self, Self::FileOpen { .. } | Self::FileRead { .. })
    }
}
