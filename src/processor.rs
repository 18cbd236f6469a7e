//! Per-file k-mer ingestion.

use std::path::Path;

use crate::{
    error::FindKmersError,
    reader::{FileLines, LineSource},
    table::KmerTable,
};

#[cfg(feature = "tracing")]
use tracing::{debug, info_span};

/// Record header marker; lines starting with it are not sequence data.
pub const HEADER_MARKER: u8 = b'>';

/// What one file contributed to the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileSummary {
    /// Sequence lines passed to the table.
    pub lines_accumulated: usize,
    /// K-mers first seen in this file, within the current window.
    pub distinct_added: usize,
}

/// Returns `true` for lines that carry sequence data.
///
/// Empty lines and header lines (first byte `>`) are skipped.
pub fn is_sequence_line(line: &[u8]) -> bool {
    line.first().is_some_and(|&b| b != HEADER_MARKER)
}

/// Streams one file's sequence lines into a [`KmerTable`].
#[derive(Debug, Clone, Default)]
pub struct FileProcessor<S = FileLines> {
    source: S,
}

impl<S: LineSource> FileProcessor<S> {
    /// Creates a processor reading through `source`.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Feeds every sequence line of `path` to `table`.
    ///
    /// # Errors
    ///
    /// Returns [`FindKmersError::FileOpen`] if the file cannot be opened and
    /// [`FindKmersError::FileRead`] if reading fails part-way; lines read
    /// before the failure stay counted.
    pub fn process(
        &self,
        path: &Path,
        table: &mut KmerTable,
    ) -> Result<FileSummary, FindKmersError> {
        #[cfg(feature = "tracing")]
        let _span = info_span!("process_file", path = %path.display()).entered();

        let mut summary = FileSummary::default();

        for line in self.source.lines(path)? {
            let line = line.map_err(|source| FindKmersError::FileRead {
                source,
                path: path.to_path_buf(),
            })?;

            if !is_sequence_line(&line) {
                continue;
            }
            summary.distinct_added += table.ingest(&line);
            summary.lines_accumulated += 1;
        }

        #[cfg(feature = "tracing")]
        debug!(
            lines = summary.lines_accumulated,
            distinct_added = summary.distinct_added,
            "Processed file"
        );

        Ok(summary)
    }
}
