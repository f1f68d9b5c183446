//! Per-iteration log sink.

use crate::error::IterationError;
use crate::layout::log_file_name;
use crate::seeds::SeedPair;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered, append-only log file owned by a single iteration.
///
/// Call [`LogSink::finish`] to flush and close it and observe any error.
/// A sink dropped without `finish` (e.g. while unwinding) still flushes its
/// buffer, but errors are lost.
pub struct LogSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LogSink {
    /// Creates the log file for iteration `index` of `total` inside `run_dir`.
    pub fn create(
        run_dir: &Path,
        index: usize,
        total: usize,
        seeds: SeedPair,
    ) -> Result<Self, IterationError> {
        let path = run_dir.join(log_file_name(index, total, seeds));
        let file = File::create(&path).map_err(|source| IterationError::CreateSink {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes the buffer and closes the file.
    pub fn finish(self) -> Result<PathBuf, IterationError> {
        let Self { path, writer } = self;
        let close = |source| IterationError::Close {
            path: path.clone(),
            source,
        };
        let file = writer.into_inner().map_err(|e| close(e.into_error()))?;
        drop(file);
        Ok(path)
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
