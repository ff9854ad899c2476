//! The transfer orchestration engine.
//!
//! One entry point, [`TransferExecutor::execute`], turns a submitted
//! transfer request into a validated, fee-adjusted, atomic set of ledger
//! mutations: structural validation, alias resolution, entity usability,
//! allowance spending, custom fee assessment, then a single staged
//! commit. Any failure before the commit leaves the ledger untouched by
//! construction.
//!
//! The engine is synchronous and single-writer: requests arrive strictly
//! sequentially from the ordering layer, so no locking happens here.

pub mod alias;
pub mod allowance;
pub mod error;
pub mod executor;
pub mod mutator;
pub mod usability;

pub use alias::AliasResolver;
pub use allowance::{AllowanceLedger, StagedAllowances};
pub use error::EngineError;
pub use executor::TransferExecutor;
pub use mutator::LedgerMutator;
pub use usability::UsabilityGate;

// The pure pre-consensus check, usable without any ledger state.
pub use meridian_transfers::validate_structure;
