//! Output module for crawl outcomes
//!
//! This module handles:
//! - The reached and broken outcome records
//! - The bounded channels sessions publish records to
//! - Persisting records as two append-only CSV tables

mod csv_writer;
mod records;
mod sink;

pub use csv_writer::{
    write_broken, write_reached, CsvOutcomeWriter, CsvTable, RowCounts, WriterTasks,
    BROKEN_HEADER, REACHED_HEADER,
};
pub use records::{BrokenRecord, ReachedRecord};
pub use sink::{OutcomeReceivers, OutcomeSink};
