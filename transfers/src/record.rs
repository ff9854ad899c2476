//! The record/receipt sink — the write-only audit stream.

use serde::{Deserialize, Serialize};

use crate::plan::{Adjustment, AssessedFee};

/// The outcome of one committed transfer: every elementary adjustment
/// actually applied (fee-derived ones flagged), plus the itemized custom
/// fees for downstream observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTransfer {
    pub adjustments: Vec<Adjustment>,
    pub assessed_fees: Vec<AssessedFee>,
}

/// Receives the applied record of each committed transfer. The engine
/// writes to the sink and never reads from it.
pub trait RecordSink {
    fn record(&mut self, applied: &AppliedTransfer);
}
