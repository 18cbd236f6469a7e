//! Find all k-mers in the FASTA files of a directory.
//!
//! Every non-header line of every input is split into all of its substrings
//! of length `1..=K` (`K` at most 8), and the occurrences are tallied either
//! as one total per k-mer or per start offset within the line. Tables are
//! written as tab-separated text, sorted by k-mer, either once per input file
//! or once for the whole directory.
//!
//! # Example
//!
//! ```rust,no_run
//! use findkmers::config::{Config, OutputMode};
//! use findkmers::kmer::MaxK;
//! use findkmers::run::DirectoryRunner;
//!
//! let config = Config::new("sequences")
//!     .with_max_k(MaxK::new(3)?)
//!     .with_output_mode(OutputMode::Combined);
//!
//! let summary = DirectoryRunner::new(config).run()?;
//! println!(
//!     "{} files processed. Totally {} kmers found.",
//!     summary.files_processed, summary.total_kmers_added
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod kmer;
pub mod naming;
pub mod processor;
pub mod progress;
pub mod reader;
pub mod run;
pub mod table;
pub mod writer;
