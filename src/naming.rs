//! Input selection and output file naming.
//!
//! Inputs are picked by a plain substring test on the file name, and per-file
//! outputs are named by substituting the output name for the first `fasta`
//! in the input's file name. Both are literal string operations, not
//! extension handling.
//!
//! # Example
//!
//! ```rust
//! use findkmers::naming::{is_input_name, per_file_output_path};
//! use std::path::{Path, PathBuf};
//!
//! assert!(is_input_name("reads.fasta"));
//! assert!(is_input_name("reads.fasta.old"));
//! assert!(!is_input_name("reads.fa"));
//!
//! assert_eq!(
//!     per_file_output_path(Path::new("data/reads.fasta"), "Kmers.txt"),
//!     PathBuf::from("data/reads.Kmers.txt")
//! );
//! ```

use std::path::{Path, PathBuf};

/// Substring an entry's name must contain to be treated as input.
pub const INPUT_MARKER: &str = ".fasta";

/// Substring replaced by the output name when deriving per-file outputs.
pub const DERIVED_MARKER: &str = "fasta";

/// Default name for output tables.
pub const DEFAULT_OUTPUT_NAME: &str = "Kmers.txt";

/// Returns `true` if a directory entry named `name` should be processed.
///
/// Hidden entries (leading `.`) are never inputs. Matching is case-sensitive.
pub fn is_input_name(name: &str) -> bool {
    !name.starts_with('.') && name.contains(INPUT_MARKER)
}

/// Output path for the table of a single input file.
///
/// The first `fasta` in the input's file name is replaced with
/// `output_name`; the directory part is left alone. A name without `fasta`
/// gets `.{output_name}` appended.
pub fn per_file_output_path(input: &Path, output_name: &str) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let derived = if name.contains(DERIVED_MARKER) {
        name.replacen(DERIVED_MARKER, output_name, 1)
    } else {
        format!("{name}.{output_name}")
    };

    input.with_file_name(derived)
}

/// Output path for the table combining every input in `directory`.
pub fn combined_output_path(directory: &Path, output_name: &str) -> PathBuf {
    directory.join(output_name)
}
