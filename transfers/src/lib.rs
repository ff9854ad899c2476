//! Transfer request model and stateless structural validation.
//!
//! A [`TransferRequest`] is the raw, user-submitted shape: participants
//! may be aliases, amounts are signed, and nothing has touched ledger
//! state yet. [`validation::validate_structure`] checks everything that
//! can be checked without state access. The alias-resolved, fee-augmented
//! form lives in [`plan::TransferPlan`].

pub mod error;
pub mod plan;
pub mod record;
pub mod request;
pub mod validation;

pub use error::TransferError;
pub use plan::{
    Adjustment, AssessedFee, CoinDelta, FeeDelta, NftMove, TokenDeltas, TransferPlan,
    UnitDelta,
};
pub use record::{AppliedTransfer, RecordSink};
pub use request::{
    AccountRef, CoinAdjustment, NftExchange, TokenAdjustment, TokenTransferList,
    TransferRequest,
};
pub use validation::validate_structure;
