//! Run configuration.
//!
//! Everything a run needs is carried in one [`Config`] value handed to the
//! [`DirectoryRunner`](crate::run::DirectoryRunner).

use std::path::PathBuf;

use crate::{
    cli::{Args, OutputFormat},
    kmer::{CountMode, MaxK},
    naming::DEFAULT_OUTPUT_NAME,
};

/// When the k-mer table is written out and reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One table for the whole directory, written after the last file.
    Combined,
    /// One table per input file, written and cleared after each file.
    #[default]
    PerFile,
}

/// Settings for one directory run.
///
/// # Example
///
/// ```rust
/// use findkmers::config::{Config, OutputMode};
/// use findkmers::kmer::{CountMode, MaxK};
///
/// let config = Config::new("data")
///     .with_max_k(MaxK::new(6)?)
///     .with_output_name("all_kmers.txt")
///     .with_output_mode(OutputMode::Combined)
///     .with_count_mode(CountMode::Positional);
///
/// assert_eq!(config.max_k.get(), 6);
/// # Ok::<(), findkmers::error::MaxKError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on k-mer length.
    pub max_k: MaxK,
    /// Directory scanned for inputs (not recursive).
    pub directory: PathBuf,
    /// Name of the combined table, or the substitute for `fasta` in per-file
    /// output names.
    pub output_name: String,
    /// When tables are written and reset.
    pub output_mode: OutputMode,
    /// What is tracked per k-mer.
    pub count_mode: CountMode,
    /// Serialization of written tables.
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_k: MaxK::default(),
            directory: PathBuf::from("."),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            output_mode: OutputMode::default(),
            count_mode: CountMode::default(),
            format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Default settings scanning `directory`.
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Builds a configuration from parsed command-line arguments.
    ///
    /// `--per-file` always selects per-file output. Otherwise an explicit
    /// `--output` selects a combined table and its absence selects per-file
    /// output.
    pub fn from_args(args: Args) -> Self {
        let count_mode = args.count_mode();
        let output_mode = if args.per_file || args.output.is_none() {
            OutputMode::PerFile
        } else {
            OutputMode::Combined
        };

        Self {
            max_k: args.max_k,
            directory: args.directory.unwrap_or_else(|| PathBuf::from(".")),
            output_name: args
                .output
                .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string()),
            output_mode,
            count_mode,
            format: args.format,
        }
    }

    /// Sets the upper bound on k-mer length.
    #[must_use]
    pub const fn with_max_k(mut self, max_k: MaxK) -> Self {
        self.max_k = max_k;
        self
    }

    /// Sets the combined table's name, also substituted into per-file names.
    #[must_use]
    pub fn with_output_name<S: Into<String>>(mut self, name: S) -> Self {
        self.output_name = name.into();
        self
    }

    /// Sets when tables are written and reset.
    #[must_use]
    pub const fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Sets what is tracked per k-mer.
    #[must_use]
    pub const fn with_count_mode(mut self, mode: CountMode) -> Self {
        self.count_mode = mode;
        self
    }

    /// Sets the serialization of written tables.
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
