//! Directory runs.
//!
//! A [`DirectoryRunner`] lists the inputs of one directory, feeds them through
//! a single [`KmerTable`] and writes the table out according to the
//! configured [`OutputMode`]: once after every file (clearing the table each
//! time) or once after the last file.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::{
    config::{Config, OutputMode},
    error::FindKmersError,
    naming::{combined_output_path, is_input_name, per_file_output_path},
    processor::{FileProcessor, FileSummary},
    progress::{FileProgress, RunEvent},
    reader::{FileLines, LineSource},
    table::KmerTable,
    writer::TableWriter,
};

#[cfg(feature = "tracing")]
use tracing::{info, warn};

/// Outcome of a directory run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Input files ingested completely.
    pub files_processed: usize,
    /// Sum of the distinct k-mers each file added to its window.
    pub total_kmers_added: usize,
    /// Tables written, in order.
    pub outputs: Vec<PathBuf>,
    /// Inputs left out because they could not be read.
    pub skipped: Vec<(PathBuf, FindKmersError)>,
    /// `true` if the run stopped early on request.
    pub cancelled: bool,
}

/// Exit status of a process stopped by SIGINT or SIGTERM.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Returns a flag that the first SIGINT or SIGTERM sets, for
/// [`DirectoryRunner::with_cancel_flag`].
///
/// A second signal exits the process at once with
/// [`INTERRUPTED_EXIT_CODE`], even in the middle of a file.
pub fn cancel_on_signals() -> io::Result<Arc<AtomicBool>> {
    use signal_hook::consts::{SIGINT, SIGTERM};

    let flag = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        // Runs before the flag is set, so only a repeated signal exits.
        signal_hook::flag::register_conditional_shutdown(
            signal,
            INTERRUPTED_EXIT_CODE,
            Arc::clone(&flag),
        )?;
        signal_hook::flag::register(signal, Arc::clone(&flag))?;
    }
    Ok(flag)
}

/// Lists the input files of `directory` in lexicographic order.
///
/// Inputs are regular files whose name contains `.fasta` and does not start
/// with `.`.
///
/// # Errors
///
/// Returns [`FindKmersError::DirectoryNotFound`] if the directory cannot be
/// read.
pub fn list_inputs(directory: &Path) -> Result<Vec<PathBuf>, FindKmersError> {
    let to_error = |source| FindKmersError::DirectoryNotFound {
        source,
        path: directory.to_path_buf(),
    };

    let mut inputs = Vec::new();
    for entry in fs::read_dir(directory).map_err(to_error)? {
        let entry = entry.map_err(to_error)?;
        let path = entry.path();
        if is_input_name(&entry.file_name().to_string_lossy()) && path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort();

    Ok(inputs)
}

/// Runs k-mer counting over one directory.
///
/// The runner owns the table for the whole run; nothing is shared between
/// runners. Each file is counted into a scratch table first and merged into
/// the window only once it has been read to the end, so a file that fails
/// part-way contributes nothing.
#[derive(Debug)]
pub struct DirectoryRunner<S = FileLines> {
    config: Config,
    processor: FileProcessor<S>,
    writer: TableWriter,
    table: KmerTable,
    scratch: KmerTable,
    cancel: Option<Arc<AtomicBool>>,
}

impl DirectoryRunner<FileLines> {
    /// Creates a runner reading input files from disk.
    pub fn new(config: Config) -> Self {
        Self::with_source(config, FileLines)
    }
}

impl<S: LineSource> DirectoryRunner<S> {
    /// Creates a runner reading input lines through `source`.
    ///
    /// Inputs are still listed from the configured directory.
    pub fn with_source(config: Config, source: S) -> Self {
        Self {
            table: KmerTable::new(config.max_k, config.count_mode),
            scratch: KmerTable::new(config.max_k, config.count_mode),
            writer: TableWriter::new(config.format),
            processor: FileProcessor::new(source),
            config,
            cancel: None,
        }
    }

    /// Stops the run before the next file once `flag` is set.
    ///
    /// Tables already written stay on disk; nothing else is written.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The run's configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The current accumulation window.
    pub const fn table(&self) -> &KmerTable {
        &self.table
    }

    /// Runs without progress reporting.
    pub fn run(&mut self) -> Result<RunSummary, FindKmersError> {
        self.run_with_progress(|_| {})
    }

    /// Processes every input of the configured directory, calling
    /// `on_event` as files are processed or skipped and as tables are
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`FindKmersError::DirectoryNotFound`] or
    /// [`FindKmersError::NoInputFiles`] before any input is read, and
    /// [`FindKmersError::OutputWrite`] if a table cannot be written. Files
    /// that cannot be read are reported through `on_event` and
    /// [`RunSummary::skipped`] instead.
    pub fn run_with_progress<F>(&mut self, mut on_event: F) -> Result<RunSummary, FindKmersError>
    where
        F: FnMut(RunEvent<'_>),
    {
        let directory = self.config.directory.clone();
        let inputs = list_inputs(&directory)?;
        if inputs.is_empty() {
            return Err(FindKmersError::NoInputFiles { path: directory });
        }

        #[cfg(feature = "tracing")]
        info!(
            directory = %directory.display(),
            files = inputs.len(),
            max_k = self.config.max_k.get(),
            mode = ?self.config.output_mode,
            "Starting k-mer run"
        );

        let total_files = inputs.len();
        let mut summary = RunSummary::default();
        self.table.clear();
        self.scratch.clear();

        for (index, path) in inputs.iter().enumerate() {
            if self.cancelled() {
                summary.cancelled = true;
                break;
            }

            match self.processor.process(path, &mut self.scratch) {
                Ok(file_summary) => {
                    let file_summary = FileSummary {
                        distinct_added: self.table.merge(&mut self.scratch),
                        ..file_summary
                    };
                    summary.files_processed += 1;
                    summary.total_kmers_added += file_summary.distinct_added;
                    on_event(RunEvent::FileProcessed(FileProgress {
                        file_index: index + 1,
                        total_files,
                        max_k: self.config.max_k,
                        path,
                        summary: file_summary,
                    }));

                    if self.config.output_mode == OutputMode::PerFile {
                        let destination = per_file_output_path(path, &self.config.output_name);
                        self.flush(destination, &mut summary, &mut on_event)?;
                    }
                }
                Err(error) if error.is_per_file() => {
                    self.scratch.clear();

                    #[cfg(feature = "tracing")]
                    warn!(path = %path.display(), %error, "Skipping unreadable input");

                    on_event(RunEvent::FileSkipped {
                        file_index: index + 1,
                        total_files,
                        path,
                        error: &error,
                    });
                    summary.skipped.push((path.clone(), error));
                }
                Err(error) => return Err(error),
            }
        }

        if self.config.output_mode == OutputMode::Combined && !summary.cancelled {
            let destination = combined_output_path(&directory, &self.config.output_name);
            self.flush(destination, &mut summary, &mut on_event)?;
        }

        #[cfg(feature = "tracing")]
        info!(
            files_processed = summary.files_processed,
            total_kmers_added = summary.total_kmers_added,
            skipped = summary.skipped.len(),
            cancelled = summary.cancelled,
            "Finished k-mer run"
        );

        Ok(summary)
    }

    /// Writes the table to `destination` and starts a new window.
    fn flush<F>(
        &mut self,
        destination: PathBuf,
        summary: &mut RunSummary,
        on_event: &mut F,
    ) -> Result<(), FindKmersError>
    where
        F: FnMut(RunEvent<'_>),
    {
        self.writer.flush(&self.table, &destination)?;
        on_event(RunEvent::TableWritten {
            path: &destination,
            kmers: self.table.len(),
        });
        self.table.clear();
        summary.outputs.push(destination);
        Ok(())
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{kmer::MaxK, reader::MemoryLines};
    use bytes::Bytes;
    use std::{fs, io};
    use tempfile::TempDir;

    /// Serves in-memory files; `broken` fails after its last line.
    struct BrokenRead {
        inner: MemoryLines,
        broken: PathBuf,
    }

    impl LineSource for BrokenRead {
        type Lines = Box<dyn Iterator<Item = io::Result<Bytes>>>;

        fn lines(&self, path: &Path) -> Result<Self::Lines, FindKmersError> {
            let lines = self.inner.lines(path)?;
            if path == self.broken {
                let failure = io::Error::new(io::ErrorKind::InvalidData, "stream corrupted");
                Ok(Box::new(lines.chain(std::iter::once(Err(failure)))))
            } else {
                Ok(Box::new(lines))
            }
        }
    }

    fn dir_with(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    #[test]
    fn list_inputs_filters_and_sorts() {
        let dir = dir_with(&[
            ("b.fasta", ""),
            ("a.fasta.txt", ""),
            ("c.fa", ""),
            (".hidden.fasta", ""),
            ("Kmers.txt", ""),
        ]);
        fs::create_dir(dir.path().join("sub.fasta")).unwrap();

        let names: Vec<_> = list_inputs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.fasta.txt", "b.fasta"]);
    }

    #[test]
    fn missing_directory() {
        let err = DirectoryRunner::new(Config::new("/nonexistent/findkmers"))
            .run()
            .unwrap_err();
        assert!(matches!(err, FindKmersError::DirectoryNotFound { .. }));
    }

    #[test]
    fn no_inputs() {
        let dir = dir_with(&[("notes.txt", "ACGT\n")]);
        let err = DirectoryRunner::new(Config::new(dir.path()))
            .run()
            .unwrap_err();
        assert!(matches!(err, FindKmersError::NoInputFiles { .. }));
        assert!(!dir.path().join("Kmers.txt").exists());
    }

    #[test]
    fn combined_run_writes_one_table() {
        let dir = dir_with(&[("a.fasta", ">seq1\nACGT\n"), ("b.fasta", ">seq2\nAC\n")]);
        let config = Config::new(dir.path())
            .with_max_k(MaxK::new(2).unwrap())
            .with_output_mode(OutputMode::Combined);

        let mut runner = DirectoryRunner::new(config);
        let summary = runner.run().unwrap();

        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.total_kmers_added, 7);
        assert_eq!(summary.outputs, [dir.path().join("Kmers.txt")]);
        assert!(runner.table().is_empty());

        let written = fs::read_to_string(dir.path().join("Kmers.txt")).unwrap();
        assert_eq!(written, "A\t2\nAC\t2\nC\t2\nCG\t1\nG\t1\nGT\t1\nT\t1\n");
    }

    #[test]
    fn per_file_run_resets_between_files() {
        let dir = dir_with(&[("a.fasta", "ACGT\n"), ("b.fasta", "AC\n")]);
        let config = Config::new(dir.path()).with_max_k(MaxK::new(2).unwrap());

        let summary = DirectoryRunner::new(config).run().unwrap();

        // b.fasta starts a fresh window, so its k-mers count as new again.
        assert_eq!(summary.total_kmers_added, 7 + 3);
        assert_eq!(
            summary.outputs,
            [
                dir.path().join("a.Kmers.txt"),
                dir.path().join("b.Kmers.txt"),
            ]
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("b.Kmers.txt")).unwrap(),
            "A\t1\nAC\t1\nC\t1\n"
        );
        assert!(!dir.path().join("Kmers.txt").exists());
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let dir = dir_with(&[("a.fasta", ""), ("b.fasta", "")]);
        // Only a.fasta can be served; b.fasta fails to open.
        let source = MemoryLines::new().with_file(dir.path().join("a.fasta"), "GG\n");
        let config = Config::new(dir.path())
            .with_max_k(MaxK::new(1).unwrap())
            .with_output_mode(OutputMode::Combined);

        let mut skipped = Vec::new();
        let summary = DirectoryRunner::with_source(config, source)
            .run_with_progress(|event| {
                if let RunEvent::FileSkipped { path, .. } = event {
                    skipped.push(path.to_path_buf());
                }
            })
            .unwrap();

        assert_eq!(summary.files_processed, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(skipped, [dir.path().join("b.fasta")]);
        assert_eq!(
            fs::read_to_string(dir.path().join("Kmers.txt")).unwrap(),
            "G\t2\n"
        );
    }

    #[test]
    fn partially_read_file_adds_nothing_to_combined_table() {
        let dir = dir_with(&[("a.fasta", ""), ("b.fasta", "")]);
        let source = BrokenRead {
            inner: MemoryLines::new()
                .with_file(dir.path().join("a.fasta"), "AC\n")
                .with_file(dir.path().join("b.fasta"), "TTTT\n"),
            broken: dir.path().join("b.fasta"),
        };
        let config = Config::new(dir.path())
            .with_max_k(MaxK::new(1).unwrap())
            .with_output_mode(OutputMode::Combined);

        let summary = DirectoryRunner::with_source(config, source).run().unwrap();

        assert_eq!(summary.files_processed, 1);
        assert_eq!(summary.total_kmers_added, 2);
        assert_eq!(summary.skipped.len(), 1);
        assert!(matches!(summary.skipped[0].1, FindKmersError::FileRead { .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join("Kmers.txt")).unwrap(),
            "A\t1\nC\t1\n"
        );
    }

    #[test]
    fn partially_read_file_does_not_leak_into_next_per_file_table() {
        let dir = dir_with(&[("a.fasta", ""), ("b.fasta", "")]);
        let source = BrokenRead {
            inner: MemoryLines::new()
                .with_file(dir.path().join("a.fasta"), "GG\n")
                .with_file(dir.path().join("b.fasta"), "AC\n"),
            broken: dir.path().join("a.fasta"),
        };
        let config = Config::new(dir.path()).with_max_k(MaxK::new(1).unwrap());

        let mut runner = DirectoryRunner::with_source(config, source);
        let summary = runner.run().unwrap();

        assert_eq!(summary.files_processed, 1);
        assert_eq!(summary.total_kmers_added, 2);
        assert_eq!(summary.outputs, [dir.path().join("b.Kmers.txt")]);
        assert!(!dir.path().join("a.Kmers.txt").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("b.Kmers.txt")).unwrap(),
            "A\t1\nC\t1\n"
        );
        assert!(runner.table().is_empty());
    }

    #[test]
    fn cancelled_run_writes_nothing_more() {
        let dir = dir_with(&[("a.fasta", "ACGT\n")]);
        let flag = Arc::new(AtomicBool::new(true));
        let config = Config::new(dir.path()).with_output_mode(OutputMode::Combined);

        let summary = DirectoryRunner::new(config)
            .with_cancel_flag(Arc::clone(&flag))
            .run()
            .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.files_processed, 0);
        assert!(summary.outputs.is_empty());
        assert!(!dir.path().join("Kmers.txt").exists());
    }

    #[test]
    fn events_arrive_in_order() {
        let dir = dir_with(&[("a.fasta", "A\n"), ("b.fasta", "C\n")]);
        let config = Config::new(dir.path()).with_max_k(MaxK::new(1).unwrap());

        let mut events = Vec::new();
        DirectoryRunner::new(config)
            .run_with_progress(|event| {
                events.push(match event {
                    RunEvent::FileProcessed(p) => format!("processed {}/{}", p.file_index, p.total_files),
                    RunEvent::FileSkipped { .. } => "skipped".to_string(),
                    RunEvent::TableWritten { kmers, .. } => format!("written {kmers}"),
                });
            })
            .unwrap();

        assert_eq!(
            events,
            ["processed 1/2", "written 1", "processed 2/2", "written 1"]
        );
    }

    #[cfg(feature = "tracing")]
    #[tracing_test::traced_test]
    #[test]
    fn run_logs_start_and_finish() {
        let dir = dir_with(&[("a.fasta", "ACGT\n")]);
        DirectoryRunner::new(Config::new(dir.path())).run().unwrap();

        assert!(logs_contain("Starting k-mer run"));
        assert!(logs_contain("Finished k-mer run"));
    }
}
