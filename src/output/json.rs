//! JSON lines output
//!
//! One serialized [`StarEvent`] per line, suited to piping into other tools.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::{OutputError, OutputResult, OutputWriter, StarsWriter};
use crate::StarEvent;

/// Writes star events as JSON lines to any byte sink
pub struct JsonLinesStarsWriter<W: Write> {
    sink: W,
    stars_written: u64,
}

impl<W: Write> JsonLinesStarsWriter<W> {
    /// Wrap a sink such as `std::io::stdout().lock()`
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            stars_written: 0,
        }
    }

    /// Get number of star events written so far
    pub fn stars_written(&self) -> u64 {
        self.stars_written
    }

    /// Consume the writer, returning the sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl JsonLinesStarsWriter<BufWriter<File>> {
    /// Create a JSON lines file at `path`, creating parent directories
    pub fn create<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        let path = path.as_ref();
        info!("Creating JSON lines writer: path={}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {}", e)))?;
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {}", e)))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> StarsWriter for JsonLinesStarsWriter<W> {
    fn write_star(&mut self, event: &StarEvent) -> OutputResult<()> {
        serde_json::to_writer(&mut self.sink, event)
            .map_err(|e| OutputError::SerializationError(e.to_string()))?;
        self.sink
            .write_all(b"\n")
            .map_err(|e| OutputError::IoError(e.to_string()))?;
        self.stars_written += 1;
        Ok(())
    }
}

impl<W: Write> OutputWriter for JsonLinesStarsWriter<W> {
    fn flush(&mut self) -> OutputResult<()> {
        self.sink
            .flush()
            .map_err(|e| OutputError::FlushError(e.to_string()))
    }

    fn close(mut self) -> OutputResult<()> {
        self.flush()
    }
}
