//! Custom fee schedule types.
//!
//! A token's fee schedule is an ordered list of [`CustomFee`] entries,
//! assessed whenever a transfer credits units of that token (or moves one
//! of its NFTs, for royalty fees). The schedule itself is set by the
//! token-management handlers, outside this engine; the transfer engine
//! only reads it.

use serde::{Deserialize, Serialize};

use crate::id::{AccountId, TokenId};

/// A fixed amount owed to the collector per triggering transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedFee {
    /// Amount in the smallest unit of the denomination.
    pub amount: u64,
    /// `None` means the fee is paid in motes (the native currency);
    /// `Some` names the token the fee is paid in.
    pub denomination: Option<TokenId>,
    pub collector: AccountId,
}

/// A fraction of the transferred amount, always denominated in the
/// triggering token itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractionalFee {
    pub numerator: u64,
    pub denominator: u64,
    /// Lower clamp on the assessed amount.
    pub minimum: u64,
    /// Upper clamp; `None` for unbounded.
    pub maximum: Option<u64>,
    /// When true the sender pays the fee on top of the transfer; when
    /// false the fee is taken out of the receivers' credits.
    pub net_of_transfers: bool,
    pub collector: AccountId,
}

/// A fraction of the fungible value exchanged for an NFT, owed to the
/// collector. Assessed against the countervalue, never the NFT itself;
/// assesses to zero when the exchange carries no countervalue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyFee {
    pub numerator: u64,
    pub denominator: u64,
    pub collector: AccountId,
}

/// One entry of a token's custom fee schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomFee {
    Fixed(FixedFee),
    Fractional(FractionalFee),
    Royalty(RoyaltyFee),
}

impl CustomFee {
    /// The account this fee is paid to.
    pub fn collector(&self) -> AccountId {
        match self {
            Self::Fixed(fee) => fee.collector,
            Self::Fractional(fee) => fee.collector,
            Self::Royalty(fee) => fee.collector,
        }
    }
}
