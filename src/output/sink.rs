//! Outcome channels between crawl sessions and the table writer

use crate::output::records::{BrokenRecord, ReachedRecord};
use crate::ScannerError;
use tokio::sync::mpsc;

/// Publishing half of the two outcome channels
///
/// Cheap to clone; every worker holds its own copy. The channels close once
/// every clone has been dropped.
#[derive(Debug, Clone)]
pub struct OutcomeSink {
    reached: mpsc::Sender<ReachedRecord>,
    broken: mpsc::Sender<BrokenRecord>,
}

/// Receiving half of the two outcome channels
#[derive(Debug)]
pub struct OutcomeReceivers {
    pub reached: mpsc::Receiver<ReachedRecord>,
    pub broken: mpsc::Receiver<BrokenRecord>,
}

impl OutcomeSink {
    /// Creates a bounded channel pair holding up to `capacity` records each
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn channel(capacity: usize) -> (Self, OutcomeReceivers) {
        let (reached_tx, reached_rx) = mpsc::channel(capacity);
        let (broken_tx, broken_rx) = mpsc::channel(capacity);

        (
            Self {
                reached: reached_tx,
                broken: broken_tx,
            },
            OutcomeReceivers {
                reached: reached_rx,
                broken: broken_rx,
            },
        )
    }

    /// Publishes a reached record, waiting while the channel is full
    pub async fn publish_reached(&self, record: ReachedRecord) -> Result<(), ScannerError> {
        self.reached
            .send(record)
            .await
            .map_err(|_| ScannerError::SinkClosed { channel: "reached" })
    }

    /// Publishes a broken record, waiting while the channel is full
    pub async fn publish_broken(&self, record: BrokenRecord) -> Result<(), ScannerError> {
        self.broken
            .send(record)
            .await
            .map_err(|_| ScannerError::SinkClosed { channel: "broken" })
    }
}

impl OutcomeReceivers {
    /// Collects everything published so far without waiting
    ///
    /// Intended for callers that already know publishing has finished.
    pub fn drain_ready(&mut self) -> (Vec<ReachedRecord>, Vec<BrokenRecord>) {
        let mut reached = Vec::new();
        while let Ok(record) = self.reached.try_recv() {
            reached.push(record);
        }
        let mut broken = Vec::new();
        while let Ok(record) = self.broken.try_recv() {
            broken.push(record);
        }
        (reached, broken)
    }
}
