//! Data output writers

use crate::StarEvent;

pub mod csv;
pub mod json;
pub mod series;

pub use series::{SeriesPoint, StarSeries};

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Buffer flush error
    #[error("flush error: {0}")]
    FlushError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Generic output writer trait
pub trait OutputWriter {
    /// Flush any buffered data to the destination
    fn flush(&mut self) -> OutputResult<()>;

    /// Close the writer and finalize output
    fn close(self) -> OutputResult<()>;
}

/// Trait for writing ordered star events
///
/// Events are expected oldest first; writers number them with a running
/// cumulative star count starting at 1.
pub trait StarsWriter: OutputWriter {
    /// Write a single star event
    fn write_star(&mut self, event: &StarEvent) -> OutputResult<()>;

    /// Write multiple star events at once
    fn write_stars(&mut self, events: &[StarEvent]) -> OutputResult<()> {
        for event in events {
            self.write_star(event)?;
        }
        Ok(())
    }
}

/// Trait for writing cumulative star series
pub trait SeriesWriter: OutputWriter {
    /// Write every point of one series
    fn write_series(&mut self, series: &StarSeries) -> OutputResult<()>;

    /// Write several series one after another
    fn write_all_series(&mut self, all: &[StarSeries]) -> OutputResult<()> {
        for series in all {
            self.write_series(series)?;
        }
        Ok(())
    }
}
