//! CSV output writer implementation

use crate::StarEvent;
use chrono::{DateTime, SecondsFormat, Utc};
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use super::{OutputError, OutputResult, OutputWriter, SeriesWriter, StarSeries, StarsWriter};

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer
const FLUSH_EVERY: u64 = 1000;

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Open `path` for buffered CSV writing, creating parent directories
fn open_csv(path: &Path, buffer_size: usize) -> OutputResult<Writer<BufWriter<File>>> {
    info!("Creating CSV writer: path={}", path.display());

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| OutputError::IoError(format!("Failed to create directory: {}", e)))?;
    }

    let file = File::create(path)
        .map_err(|e| OutputError::IoError(format!("Failed to create file: {}", e)))?;

    // Headers are written by csv::Writer on the first serialize()
    Ok(Writer::from_writer(BufWriter::with_capacity(buffer_size, file)))
}

/// Flush, unwrap and fsync a CSV writer
fn finish_csv(mut writer: Writer<BufWriter<File>>) -> OutputResult<()> {
    writer
        .flush()
        .map_err(|e| OutputError::FlushError(format!("Failed to flush: {}", e)))?;

    let buf_writer = writer
        .into_inner()
        .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {}", e)))?;

    let file = buf_writer
        .into_inner()
        .map_err(|e| OutputError::IoError(format!("Failed to get file handle: {}", e)))?;

    file.sync_all()
        .map_err(|e| OutputError::IoError(format!("Failed to sync file: {}", e)))
}

/// CSV record for a star event
#[derive(Debug, Serialize)]
struct StarRecord<'a> {
    starred_at: String,
    login: &'a str,
    account_type: &'a str,
    cumulative: u64,
}

/// CSV writer for star events
pub struct CsvStarsWriter {
    writer: Writer<BufWriter<File>>,
    stars_written: u64,
}

impl CsvStarsWriter {
    /// Create a new CSV stars writer with the default buffer size
    pub fn new<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        Self::new_with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new CSV stars writer with a custom buffer size in bytes
    pub fn new_with_buffer_size<P: AsRef<Path>>(
        path: P,
        buffer_size: usize,
    ) -> OutputResult<Self> {
        Ok(Self {
            writer: open_csv(path.as_ref(), buffer_size)?,
            stars_written: 0,
        })
    }

    /// Get number of star events written so far
    pub fn stars_written(&self) -> u64 {
        self.stars_written
    }
}

impl StarsWriter for CsvStarsWriter {
    fn write_star(&mut self, event: &StarEvent) -> OutputResult<()> {
        let record = StarRecord {
            starred_at: timestamp(&event.starred_at),
            login: &event.user.login,
            account_type: &event.user.account_type,
            cumulative: self.stars_written + 1,
        };

        self.writer
            .serialize(&record)
            .map_err(|e| OutputError::CsvError(format!("Failed to write star: {}", e)))?;

        self.stars_written += 1;

        if self.stars_written % FLUSH_EVERY == 0 {
            self.flush()?;
            debug!("Progress: {} stars written", self.stars_written);
        }

        Ok(())
    }
}

impl OutputWriter for CsvStarsWriter {
    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {}", e)))
    }

    fn close(self) -> OutputResult<()> {
        debug!("Closing CSV writer: {} total stars written", self.stars_written);
        let written = self.stars_written;
        finish_csv(self.writer)?;
        info!("CSV writer closed successfully: {} stars written", written);
        Ok(())
    }
}

/// CSV record for a cumulative series point
#[derive(Debug, Serialize)]
struct SeriesRecord<'a> {
    repository: &'a str,
    starred_at: String,
    stars: u64,
}

/// CSV writer for cumulative star series, one row per point
pub struct CsvSeriesWriter {
    writer: Writer<BufWriter<File>>,
    points_written: u64,
    series_written: usize,
}

impl CsvSeriesWriter {
    /// Create a new CSV series writer
    pub fn new<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        Ok(Self {
            writer: open_csv(path.as_ref(), DEFAULT_BUFFER_SIZE)?,
            points_written: 0,
            series_written: 0,
        })
    }

    /// Get number of points written so far
    pub fn points_written(&self) -> u64 {
        self.points_written
    }

    /// Get number of series written so far
    pub fn series_written(&self) -> usize {
        self.series_written
    }
}

impl SeriesWriter for CsvSeriesWriter {
    fn write_series(&mut self, series: &StarSeries) -> OutputResult<()> {
        for point in series.points() {
            let record = SeriesRecord {
                repository: series.repository(),
                starred_at: timestamp(&point.starred_at),
                stars: point.stars,
            };
            self.writer
                .serialize(&record)
                .map_err(|e| OutputError::CsvError(format!("Failed to write point: {}", e)))?;

            self.points_written += 1;
            if self.points_written % FLUSH_EVERY == 0 {
                self.flush()?;
            }
        }

        self.series_written += 1;
        debug!(
            "Series for {} written: {} points",
            series.repository(),
            series.len()
        );
        Ok(())
    }
}

impl OutputWriter for CsvSeriesWriter {
    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {}", e)))
    }

    fn close(self) -> OutputResult<()> {
        let (series, points) = (self.series_written, self.points_written);
        finish_csv(self.writer)?;
        info!(
            "CSV series writer closed successfully: {} series, {} points",
            series, points
        );
        Ok(())
    }
}
