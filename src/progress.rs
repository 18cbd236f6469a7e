//! Progress reporting for directory runs.
//!
//! [`DirectoryRunner::run_with_progress`](crate::run::DirectoryRunner::run_with_progress)
//! hands a [`RunEvent`] to a caller-supplied callback after each file and each
//! table written, so the caller decides how (or whether) to display it.
//!
//! # Example
//!
//! ```rust,no_run
//! use findkmers::config::Config;
//! use findkmers::progress::RunEvent;
//! use findkmers::run::DirectoryRunner;
//!
//! let mut runner = DirectoryRunner::new(Config::new("data"));
//! let summary = runner.run_with_progress(|event| {
//!     if let RunEvent::FileProcessed(progress) = event {
//!         println!("{}", progress);
//!     }
//! })?;
//! # Ok::<(), findkmers::error::FindKmersError>(())
//! ```

use std::{fmt, path::Path};

use crate::{error::FindKmersError, kmer::MaxK, processor::FileSummary};

/// Snapshot taken right after one input file was processed.
#[derive(Debug, Clone, Copy)]
pub struct FileProgress<'a> {
    /// 1-based position of this file in the run.
    pub file_index: usize,
    /// Number of input files found in the directory.
    pub total_files: usize,
    /// Upper bound on k-mer length for the run.
    pub max_k: MaxK,
    /// The input file.
    pub path: &'a Path,
    /// What the file contributed.
    pub summary: FileSummary,
}

impl fmt::Display for FileProgress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File {}/{} k={}: {} processed. {} kmers added.",
            self.file_index,
            self.total_files,
            self.max_k,
            self.path.display(),
            self.summary.distinct_added
        )
    }
}

/// Something observable that happened during a run.
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// An input file was fully ingested.
    FileProcessed(FileProgress<'a>),
    /// An input file could not be read and was left out.
    FileSkipped {
        /// 1-based position of this file in the run.
        file_index: usize,
        /// Number of input files found in the directory.
        total_files: usize,
        /// The input file.
        path: &'a Path,
        /// Why it was skipped.
        error: &'a FindKmersError,
    },
    /// A table was flushed to disk.
    TableWritten {
        /// Destination file.
        path: &'a Path,
        /// Distinct k-mers written.
        kmers: usize,
    },
}
