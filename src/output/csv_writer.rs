//! Append-only CSV tables for outcome records
//!
//! Each table gets its header row only when the file is created (or found
//! empty); later runs append below earlier rows. Rows are written in the
//! order records are received and flushed one by one.

use crate::config::OutputConfig;
use crate::output::records::{BrokenRecord, ReachedRecord};
use crate::output::sink::OutcomeReceivers;
use crate::ScannerError;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Header of the reached-page table
pub const REACHED_HEADER: [&str; 3] = ["URL", "Depth", "Timestamp"];

/// Header of the broken-page table
pub const BROKEN_HEADER: [&str; 2] = ["URL", "Timestamp"];

/// One append-only CSV file
pub struct CsvTable {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvTable {
    /// Opens `path` for appending, writing `header` first if the file is empty
    pub fn open(path: &Path, header: &[&str]) -> Result<Self, ScannerError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_empty = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if is_empty {
            writer.write_record(header)?;
            writer.flush()?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    /// Appends one row and flushes it to disk
    pub fn append<I, T>(&mut self, row: I) -> Result<(), ScannerError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(row)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Writer for the reached and broken tables
pub struct CsvOutcomeWriter {
    reached: CsvTable,
    broken: CsvTable,
}

/// Running writer tasks, one per table
#[derive(Debug)]
pub struct WriterTasks {
    reached: JoinHandle<Result<usize, ScannerError>>,
    broken: JoinHandle<Result<usize, ScannerError>>,
}

/// Rows written by a finished writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
    pub reached: usize,
    pub broken: usize,
}

impl CsvOutcomeWriter {
    /// Creates the data directory and opens both tables
    pub fn open(config: &OutputConfig) -> Result<Self, ScannerError> {
        std::fs::create_dir_all(&config.data_dir)?;

        let reached = CsvTable::open(&config.reached_path(), &REACHED_HEADER)?;
        let broken = CsvTable::open(&config.broken_path(), &BROKEN_HEADER)?;

        tracing::debug!(
            "Outcome tables: {} and {}",
            reached.path().display(),
            broken.path().display()
        );

        Ok(Self { reached, broken })
    }

    /// Starts draining both channels into their tables
    ///
    /// Each task ends when its channel closes, that is when every
    /// `OutcomeSink` clone has been dropped.
    pub fn spawn(self, receivers: OutcomeReceivers) -> WriterTasks {
        let OutcomeReceivers { reached, broken } = receivers;

        WriterTasks {
            reached: tokio::spawn(write_reached(self.reached, reached)),
            broken: tokio::spawn(write_broken(self.broken, broken)),
        }
    }
}

impl WriterTasks {
    /// Waits for both writers and returns how many rows each appended
    pub async fn finish(self) -> Result<RowCounts, ScannerError> {
        let reached = self.reached.await?;
        let broken = self.broken.await?;

        Ok(RowCounts {
            reached: reached?,
            broken: broken?,
        })
    }
}

/// Appends reached records until the channel closes
pub async fn write_reached(
    mut table: CsvTable,
    mut records: mpsc::Receiver<ReachedRecord>,
) -> Result<usize, ScannerError> {
    let mut rows = 0;
    while let Some(record) = records.recv().await {
        if let Err(e) = table.append(record.to_row()) {
            tracing::error!("Failed to write {}: {}", table.path().display(), e);
            return Err(e);
        }
        rows += 1;
    }
    Ok(rows)
}

/// Appends broken records until the channel closes
pub async fn write_broken(
    mut table: CsvTable,
    mut records: mpsc::Receiver<BrokenRecord>,
) -> Result<usize, ScannerError> {
    let mut rows = 0;
    while let Some(record) = records.recv().await {
        if let Err(e) = table.append(record.to_row()) {
            tracing::error!("Failed to write {}: {}", table.path().display(), e);
            return Err(e);
        }
        rows += 1;
    }
    Ok(rows)
}
