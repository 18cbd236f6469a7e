//! Line sources.
//!
//! A [`LineSource`] turns a path into a lazy, finite sequence of lines. It does
//! no filtering: header and blank lines are dropped later by the
//! [`FileProcessor`](crate::processor::FileProcessor).

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader, Cursor},
    path::{Path, PathBuf},
};

use bytes::Bytes;

use crate::error::FindKmersError;

/// Produces the lines of the file at a path.
///
/// Each call to [`lines`](LineSource::lines) starts a fresh pass over the
/// file; the returned iterator is consumed once.
pub trait LineSource {
    /// Iterator over raw line bytes, terminators stripped.
    type Lines: Iterator<Item = io::Result<Bytes>>;

    /// Opens `path` for reading.
    fn lines(&self, path: &Path) -> Result<Self::Lines, FindKmersError>;
}

/// Reads lines from files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLines;

impl LineSource for FileLines {
    type Lines = Lines<BufReader<File>>;

    fn lines(&self, path: &Path) -> Result<Self::Lines, FindKmersError> {
        let file = File::open(path).map_err(|source| FindKmersError::FileOpen {
            source,
            path: path.to_path_buf(),
        })?;
        Ok(Lines::new(BufReader::new(file)))
    }
}

/// Serves lines from file contents held in memory, keyed by path.
///
/// # Example
///
/// ```rust
/// use findkmers::reader::{LineSource, MemoryLines};
/// use std::path::Path;
///
/// let source = MemoryLines::new().with_file("a.fasta", ">seq1\nACGT\n");
/// let lines: Vec<_> = source.lines(Path::new("a.fasta"))?.collect::<Result<_, _>>()?;
/// assert_eq!(lines, vec![&b">seq1"[..], &b"ACGT"[..]]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLines {
    files: HashMap<PathBuf, Bytes>,
}

impl MemoryLines {
    /// Creates a source with no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the contents served for `path`.
    #[must_use]
    pub fn with_file<P, C>(mut self, path: P, contents: C) -> Self
    where
        P: Into<PathBuf>,
        C: Into<Bytes>,
    {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl LineSource for MemoryLines {
    type Lines = Lines<Cursor<Bytes>>;

    fn lines(&self, path: &Path) -> Result<Self::Lines, FindKmersError> {
        let contents = self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| FindKmersError::FileOpen {
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
                path: path.to_path_buf(),
            })?;
        Ok(Lines::new(Cursor::new(contents)))
    }
}

/// Splits a reader on `\n`, dropping the terminator and a preceding `\r`.
///
/// Every other byte is kept as-is.
#[derive(Debug)]
pub struct Lines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Lines<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = io::Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(Bytes::copy_from_slice(&self.buf)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
