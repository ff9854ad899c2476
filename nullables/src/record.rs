//! Nullable record sink — collects applied transfers in memory.

use meridian_transfers::{AppliedTransfer, RecordSink};

/// Accumulates every record written by the engine, in order.
#[derive(Default)]
pub struct NullRecordSink {
    pub records: Vec<AppliedTransfer>,
}

impl NullRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&AppliedTransfer> {
        self.records.last()
    }
}

impl RecordSink for NullRecordSink {
    fn record(&mut self, applied: &AppliedTransfer) {
        self.records.push(applied.clone());
    }
}
