//! Serializing k-mer tables.
//!
//! The default format is tab-separated, one k-mer per line in ascending
//! lexicographic order:
//!
//! ```text
//! <kmer>\t<count>                      aggregate mode
//! <kmer>\t<count@0>\t<count@1>\t...    positional mode
//! ```
//!
//! Keys are written as the raw bytes they were read as, tabs included. In a
//! positional table a key holding a tab followed by digits reads back
//! ambiguously; [`read_tsv`] takes the shortest such key.

use std::{
    borrow::Cow,
    fs::File,
    io::{self, BufRead, BufWriter, Write},
    path::Path,
};

use bytes::Bytes;
use serde::Serialize;

use crate::{
    cli::OutputFormat, error::FindKmersError, kmer::CountMode, reader::Lines, table::KmerTable,
};

#[cfg(feature = "tracing")]
use tracing::{info, info_span};

/// A k-mer with its counts, used for JSON serialization.
#[derive(Serialize)]
struct KmerCounts<'a> {
    kmer: Cow<'a, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    counts: Option<&'a [u64]>,
}

/// Writes a [`KmerTable`] to its destination.
///
/// The writer never mutates the table; clearing it after a flush is up to the
/// caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableWriter {
    format: OutputFormat,
}

impl TableWriter {
    /// Creates a writer emitting `format`.
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// The configured output format.
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Writes `table` to `destination`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`FindKmersError::OutputWrite`] if the file cannot be created
    /// or written.
    pub fn flush(&self, table: &KmerTable, destination: &Path) -> Result<(), FindKmersError> {
        #[cfg(feature = "tracing")]
        let _span = info_span!("flush_table", path = %destination.display()).entered();

        let to_error = |source: io::Error| FindKmersError::OutputWrite {
            source,
            path: destination.to_path_buf(),
        };

        let file = File::create(destination).map_err(to_error)?;
        self.write_to(table, BufWriter::new(file))
            .map_err(to_error)?;

        #[cfg(feature = "tracing")]
        info!(kmers = table.len(), "Wrote k-mer table");

        Ok(())
    }

    /// Writes `table` to any writer.
    pub fn write_to<W: Write>(&self, table: &KmerTable, mut writer: W) -> io::Result<()> {
        let entries = table.sorted();

        match self.format {
            OutputFormat::Tsv => {
                for (kmer, record) in entries {
                    writer.write_all(kmer)?;
                    for value in record.values() {
                        write!(writer, "\t{value}")?;
                    }
                    writer.write_all(b"\n")?;
                }
            }
            OutputFormat::Json => {
                let json_data: Vec<KmerCounts<'_>> = entries
                    .into_iter()
                    .map(|(kmer, record)| {
                        let values = record.values();
                        let (count, counts) = match table.mode() {
                            CountMode::Aggregate => (Some(record.total()), None),
                            CountMode::Positional => (None, Some(values)),
                        };
                        KmerCounts {
                            kmer: String::from_utf8_lossy(kmer),
                            count,
                            counts,
                        }
                    })
                    .collect();
                serde_json::to_writer_pretty(&mut writer, &json_data)?;
                writeln!(writer)?;
            }
        }

        writer.flush()
    }
}

/// Parses a TSV table written in `mode` back into `(kmer, values)` rows, in
/// file order.
///
/// Aggregate rows split off their last column, so any key reads back exactly.
/// Positional rows have a varying number of columns; the key ends at the
/// first tab after which every column is a count.
///
/// # Errors
///
/// Returns [`FindKmersError::MalformedTable`] for a line without values or
/// with a value that is not a non-negative integer.
pub fn read_tsv<R: BufRead>(
    reader: R,
    mode: CountMode,
) -> Result<Vec<(Bytes, Vec<u64>)>, FindKmersError> {
    let mut rows = Vec::new();

    for (index, line) in Lines::new(reader).enumerate() {
        let line_no = index + 1;
        let malformed = |details: String| FindKmersError::MalformedTable {
            line: line_no,
            details,
        };
        let line = line.map_err(|e| malformed(e.to_string()))?;

        if !line.contains(&TAB) {
            return Err(malformed("missing count column".to_string()));
        }

        let row = match mode {
            CountMode::Aggregate => {
                let mut fields = line.rsplitn(2, |&b| b == TAB);
                let count = fields.next().unwrap_or_default();
                let kmer = fields.next().unwrap_or_default();
                let count = parse_count(count).ok_or_else(|| {
                    malformed(format!(
                        "'{}' is not a count",
                        String::from_utf8_lossy(count)
                    ))
                })?;
                (Bytes::copy_from_slice(kmer), vec![count])
            }
            CountMode::Positional => line
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == TAB)
                .find_map(|(at, _)| {
                    parse_counts(&line[at + 1..])
                        .map(|values| (line.slice(..at), values))
                })
                .ok_or_else(|| malformed("no count columns after the k-mer".to_string()))?,
        };

        rows.push(row);
    }

    Ok(rows)
}

const TAB: u8 = b'\t';

fn parse_count(field: &[u8]) -> Option<u64> {
    std::str::from_utf8(field).ok()?.parse().ok()
}

fn parse_counts(fields: &[u8]) -> Option<Vec<u64>> {
    fields.split(|&b| b == TAB).map(parse_count).collect()
}
