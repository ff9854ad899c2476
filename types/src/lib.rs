//! Fundamental types for the Meridian transfer engine.
//!
//! Everything here is a plain value type: entity identifiers, aliases,
//! key material, custom fee schedules, and the governable transfer
//! parameters. No storage, no I/O.

pub mod alias;
pub mod fee;
pub mod id;
pub mod keys;
pub mod params;

pub use alias::Alias;
pub use fee::{CustomFee, FixedFee, FractionalFee, RoyaltyFee};
pub use id::{AccountId, NftId, TokenId};
pub use keys::PublicKey;
pub use params::{ParamsError, TransferParams};
