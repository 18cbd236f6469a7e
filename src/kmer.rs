//! K-mer length bounds and per-k-mer count records.

use clap::ValueEnum;

use crate::error::MaxKError;

/// Largest k-mer length that can be requested.
pub const MAX_K: usize = 8;

/// Default upper bound on k-mer length.
pub const DEFAULT_MAX_K: usize = 4;

/// Validated upper bound on k-mer length, always within `1..=8`.
///
/// Every length from 1 up to and including this bound is enumerated when a
/// line is ingested.
///
/// # Example
///
/// ```rust
/// use findkmers::kmer::MaxK;
///
/// let k = MaxK::new(3)?;
/// assert_eq!(k.get(), 3);
///
/// // Out-of-range requests clamp instead of failing.
/// assert_eq!(MaxK::clamped(20).get(), 8);
/// assert_eq!(MaxK::clamped(-1).get(), 1);
/// # Ok::<(), findkmers::error::MaxKError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaxK(usize);

impl MaxK {
    /// Creates a bound, rejecting values outside `1..=8`.
    pub const fn new(k: usize) -> Result<Self, MaxKError> {
        if k >= 1 && k <= MAX_K {
            Ok(Self(k))
        } else {
            Err(MaxKError {
                k,
                min: 1,
                max: MAX_K,
            })
        }
    }

    /// Creates a bound, clamping `k` into `1..=8`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn clamped(k: i64) -> Self {
        if k < 1 {
            Self(1)
        } else if k > MAX_K as i64 {
            Self(MAX_K)
        } else {
            Self(k as usize)
        }
    }

    /// Returns the bound as a `usize`.
    pub const fn get(self) -> usize {
        self.0
    }

    /// Iterates over every k-mer length this bound enumerates.
    pub fn lengths(self) -> std::ops::RangeInclusive<usize> {
        1..=self.0
    }
}

impl Default for MaxK {
    fn default() -> Self {
        Self(DEFAULT_MAX_K)
    }
}

impl std::fmt::Display for MaxK {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What is tracked for each distinct k-mer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CountMode {
    /// A single total per k-mer.
    #[default]
    Aggregate,
    /// One total per start offset within the line.
    Positional,
}

/// Occurrence counts of one k-mer within the current accumulation window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountRecord {
    /// Total occurrences.
    Aggregate(u64),
    /// Occurrences indexed by 0-based start offset.
    ///
    /// Sized by the line that first inserted the k-mer and grown, zero-filled,
    /// when a later line reports an offset past the end.
    Positional(Vec<u64>),
}

impl CountRecord {
    /// Builds the record for a k-mer's first occurrence.
    ///
    /// `windows` is the number of start offsets available for this k-mer
    /// length in the inserting line, i.e. `line.len() - k + 1`.
    pub(crate) fn first(mode: CountMode, offset: usize, windows: usize) -> Self {
        match mode {
            CountMode::Aggregate => Self::Aggregate(1),
            CountMode::Positional => {
                let mut counts = vec![0; windows.max(offset + 1)];
                counts[offset] = 1;
                Self::Positional(counts)
            }
        }
    }

    /// Records one more occurrence starting at `offset`.
    pub(crate) fn increment(&mut self, offset: usize) {
        match self {
            Self::Aggregate(count) => *count += 1,
            Self::Positional(counts) => {
                if offset >= counts.len() {
                    counts.resize(offset + 1, 0);
                }
                counts[offset] += 1;
            }
        }
    }

    /// Adds the occurrences of `other` to this record.
    ///
    /// Positional vectors are added offset by offset. This record grows,
    /// zero-filled, only as far as the last offset `other` actually counted,
    /// the same length ingesting `other`'s lines here directly would give.
    /// An aggregate `other` added to a positional record lands on offset 0.
    pub(crate) fn add(&mut self, other: Self) {
        match (self, other) {
            (Self::Aggregate(count), other) => *count += other.total(),
            (Self::Positional(counts), Self::Positional(more)) => {
                let used = more.iter().rposition(|&n| n != 0).map_or(0, |i| i + 1);
                if used > counts.len() {
                    counts.resize(used, 0);
                }
                for (slot, n) in counts.iter_mut().zip(&more[..used]) {
                    *slot += n;
                }
            }
            (Self::Positional(counts), Self::Aggregate(n)) => {
                if counts.is_empty() {
                    counts.push(0);
                }
                counts[0] += n;
            }
        }
    }

    /// Total occurrences across all offsets.
    pub fn total(&self) -> u64 {
        match self {
            Self::Aggregate(count) => *count,
            Self::Positional(counts) => counts.iter().sum(),
        }
    }

    /// The record's output columns: one value in aggregate mode, one per
    /// offset in positional mode.
    pub fn values(&self) -> &[u64] {
        match self {
            Self::Aggregate(count) => std::slice::from_ref(count),
            Self::Positional(counts) => counts,
        }
    }
}
