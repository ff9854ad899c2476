//! The resolved transfer plan — request-scoped staging for one transfer.
//!
//! Produced by alias resolution from a validated request, expanded by the
//! custom fee assessor, consumed exactly once by the ledger mutator, then
//! discarded. All participants are concrete account numbers here.

use meridian_types::{AccountId, TokenId};
use serde::{Deserialize, Serialize};

/// A resolved native-currency delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinDelta {
    pub account: AccountId,
    pub amount: i64,
    pub approval: bool,
}

/// A resolved fungible-token delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDelta {
    pub account: AccountId,
    pub amount: i64,
    pub approval: bool,
}

/// A resolved NFT ownership change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMove {
    pub sender: AccountId,
    pub receiver: AccountId,
    pub serial: u64,
    pub approval: bool,
}

/// All resolved movements of one token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDeltas {
    pub token: TokenId,
    pub units: Vec<UnitDelta>,
    pub moves: Vec<NftMove>,
}

/// A fee-driven balance delta appended by the assessor. Kept apart from
/// the user's deltas so the record can itemize them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDelta {
    /// `None` for motes, `Some` for a token denomination.
    pub token: Option<TokenId>,
    pub account: AccountId,
    pub amount: i64,
}

/// One assessed custom fee, as itemized for downstream observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessedFee {
    /// Denomination: `None` for motes.
    pub token: Option<TokenId>,
    pub amount: u64,
    pub collector: AccountId,
    /// The accounts the fee was effectively taken from.
    pub payers: Vec<AccountId>,
}

/// One applied elementary adjustment, in record order. Fee-derived
/// entries carry `fee: true` and are never merged into user entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjustment {
    Coin {
        account: AccountId,
        amount: i64,
        fee: bool,
    },
    TokenUnit {
        token: TokenId,
        account: AccountId,
        amount: i64,
        fee: bool,
    },
    NftOwner {
        token: TokenId,
        serial: u64,
        from: AccountId,
        to: AccountId,
    },
}

/// The full staged delta set for one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPlan {
    pub payer: AccountId,
    pub coins: Vec<CoinDelta>,
    pub tokens: Vec<TokenDeltas>,
    /// Balanced sender→collector pairs appended by the fee assessor.
    pub fee_deltas: Vec<FeeDelta>,
    /// Itemization of every assessed fee, in assessment order.
    pub assessed_fees: Vec<AssessedFee>,
}

impl TransferPlan {
    pub fn new(payer: AccountId) -> Self {
        Self {
            payer,
            coins: Vec::new(),
            tokens: Vec::new(),
            fee_deltas: Vec::new(),
            assessed_fees: Vec::new(),
        }
    }

    /// Net native-currency movement, fee deltas included. Zero for any
    /// plan that conserves value.
    pub fn coin_net(&self) -> i128 {
        let user: i128 = self.coins.iter().map(|d| i128::from(d.amount)).sum();
        let fees: i128 = self
            .fee_deltas
            .iter()
            .filter(|d| d.token.is_none())
            .map(|d| i128::from(d.amount))
            .sum();
        user + fees
    }

    /// Net movement of one token's units, fee deltas included.
    pub fn token_net(&self, token: TokenId) -> i128 {
        let user: i128 = self
            .tokens
            .iter()
            .filter(|t| t.token == token)
            .flat_map(|t| t.units.iter())
            .map(|d| i128::from(d.amount))
            .sum();
        let fees: i128 = self
            .fee_deltas
            .iter()
            .filter(|d| d.token == Some(token))
            .map(|d| i128::from(d.amount))
            .sum();
        user + fees
    }

    /// The ordered record of elementary adjustments this plan applies:
    /// user coin deltas, then each token list in request order, then the
    /// fee deltas in assessment order.
    pub fn adjustments(&self) -> Vec<Adjustment> {
        let mut out = Vec::new();
        for delta in &self.coins {
            out.push(Adjustment::Coin {
                account: delta.account,
                amount: delta.amount,
                fee: false,
            });
        }
        for list in &self.tokens {
            for delta in &list.units {
                out.push(Adjustment::TokenUnit {
                    token: list.token,
                    account: delta.account,
                    amount: delta.amount,
                    fee: false,
                });
            }
            for mv in &list.moves {
                out.push(Adjustment::NftOwner {
                    token: list.token,
                    serial: mv.serial,
                    from: mv.sender,
                    to: mv.receiver,
                });
            }
        }
        for delta in &self.fee_deltas {
            out.push(match delta.token {
                Some(token) => Adjustment::TokenUnit {
                    token,
                    account: delta.account,
                    amount: delta.amount,
                    fee: true,
                },
                None => Adjustment::Coin {
                    account: delta.account,
                    amount: delta.amount,
                    fee: true,
                },
            });
        }
        out
    }
}
