//! K-mer accumulation.
//!
//! A [`KmerTable`] owns the counts for one accumulation window. Each ingested
//! line contributes every substring of length `1..=K`; keys of different
//! lengths share the table, and output order is lexicographic on the key
//! bytes regardless of insertion order.
//!
//! # Example
//!
//! ```rust
//! use findkmers::kmer::{CountMode, MaxK};
//! use findkmers::table::KmerTable;
//!
//! let mut table = KmerTable::new(MaxK::new(2)?, CountMode::Aggregate);
//! let added = table.ingest(b"ACGT");
//!
//! // A, C, G, T, AC, CG, GT
//! assert_eq!(added, 7);
//! assert_eq!(table.get(b"CG").map(|r| r.total()), Some(1));
//! # Ok::<(), findkmers::error::MaxKError>(())
//! ```

use std::{collections::HashMap, hash::BuildHasherDefault};

use bytes::Bytes;
use rustc_hash::FxHasher;

use crate::kmer::{CountMode, CountRecord, MaxK};

/// A `HashMap` keyed by k-mer bytes w/ `FxHasher`.
type FxTable = HashMap<Bytes, CountRecord, BuildHasherDefault<FxHasher>>;

/// Mapping from k-mer to its [`CountRecord`] for the current window.
#[derive(Debug, Clone)]
pub struct KmerTable {
    max_k: MaxK,
    mode: CountMode,
    counts: FxTable,
}

impl KmerTable {
    /// Creates an empty table enumerating lengths `1..=max_k`.
    pub fn new(max_k: MaxK, mode: CountMode) -> Self {
        Self {
            max_k,
            mode,
            counts: FxTable::default(),
        }
    }

    /// Counts every k-mer of length `1..=K` in `line`.
    ///
    /// Matching is byte-exact: no case folding, no alphabet check. Lengths
    /// longer than the line contribute nothing.
    ///
    /// Returns the number of keys this line inserted for the first time,
    /// summed over all lengths.
    pub fn ingest(&mut self, line: &[u8]) -> usize {
        let mut added = 0;

        for k in self.max_k.lengths() {
            if line.len() < k {
                break;
            }
            let windows = line.len() - k + 1;

            for offset in 0..windows {
                let sub = &line[offset..offset + k];

                if let Some(record) = self.counts.get_mut(sub) {
                    record.increment(offset);
                } else {
                    self.counts.insert(
                        Bytes::copy_from_slice(sub),
                        CountRecord::first(self.mode, offset, windows),
                    );
                    added += 1;
                }
            }
        }

        added
    }

    /// Moves every count of `other` into this table, leaving `other` empty.
    ///
    /// The result is the table that ingesting `other`'s lines here directly
    /// would have produced, positional vector lengths included. Returns the
    /// number of keys new to this table.
    pub fn merge(&mut self, other: &mut Self) -> usize {
        let mut added = 0;

        for (kmer, record) in other.counts.drain() {
            if let Some(existing) = self.counts.get_mut(&kmer) {
                existing.add(record);
            } else {
                self.counts.insert(kmer, record);
                added += 1;
            }
        }

        added
    }

    /// Looks up the record for a k-mer.
    pub fn get(&self, kmer: &[u8]) -> Option<&CountRecord> {
        self.counts.get(kmer)
    }

    /// Number of distinct k-mers in the window.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing has been ingested since the last reset.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Empties the table, ending the current accumulation window.
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// The configured upper bound on k-mer length.
    pub const fn max_k(&self) -> MaxK {
        self.max_k
    }

    /// The configured counting mode.
    pub const fn mode(&self) -> CountMode {
        self.mode
    }

    /// Entries in ascending lexicographic key order.
    pub fn sorted(&self) -> Vec<(&Bytes, &CountRecord)> {
        let mut entries: Vec<_> = self.counts.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Number of substrings [`KmerTable::ingest`] visits for a line of
/// `line_len` bytes: `sum over k in 1..=K of max(0, line_len - k + 1)`.
pub fn substring_count(line_len: usize, max_k: MaxK) -> usize {
    max_k
        .lengths()
        .map(|k| (line_len + 1).saturating_sub(k))
        .sum()
}
