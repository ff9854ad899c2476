//! The raw transfer request as submitted.

use meridian_types::{AccountId, Alias, TokenId};
use serde::{Deserialize, Serialize};

/// A transfer participant: a known account number, or a public-key alias
/// that may not denote an account yet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountRef {
    Id(AccountId),
    Alias(Alias),
}

impl AccountRef {
    /// Whether the reference is present at all. A zero account id or an
    /// empty alias counts as missing.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Id(id) => id.is_set(),
            Self::Alias(alias) => !alias.is_empty(),
        }
    }
}

impl From<AccountId> for AccountRef {
    fn from(id: AccountId) -> Self {
        Self::Id(id)
    }
}

impl std::fmt::Display for AccountRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Alias(alias) => write!(f, "alias:{alias}"),
        }
    }
}

/// One signed native-currency entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinAdjustment {
    pub account: AccountRef,
    /// Motes; negative debits the account, positive credits it.
    pub amount: i64,
    /// Marks the debit as spending a pre-authorized allowance rather than
    /// being covered by the owner's signature.
    pub approval: bool,
}

/// One signed fungible-token entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAdjustment {
    pub account: AccountRef,
    /// Token units; negative debits, positive credits.
    pub amount: i64,
    pub approval: bool,
}

/// One NFT ownership exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftExchange {
    pub sender: AccountRef,
    pub receiver: AccountRef,
    /// Wire-signed so a malformed non-positive serial can be reported
    /// rather than silently reinterpreted.
    pub serial: i64,
    pub approval: bool,
}

/// All movements of one token within the request. Exactly one of the two
/// lists must be non-empty: a token moves either as fungible units or as
/// individual serials, never both in the same list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransferList {
    pub token: TokenId,
    pub adjustments: Vec<TokenAdjustment>,
    pub nft_exchanges: Vec<NftExchange>,
}

/// A full transfer request: native movements plus any number of token
/// transfer lists, validated and applied as one atomic unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// The already-authorized transaction payer; the spender for
    /// approval-flagged entries.
    pub payer: AccountId,
    pub coin_adjustments: Vec<CoinAdjustment>,
    pub token_transfers: Vec<TokenTransferList>,
}

impl TransferRequest {
    pub fn new(payer: AccountId) -> Self {
        Self {
            payer,
            coin_adjustments: Vec::new(),
            token_transfers: Vec::new(),
        }
    }

    /// Total fungible entries across all token lists.
    pub fn token_adjustment_count(&self) -> usize {
        self.token_transfers.iter().map(|t| t.adjustments.len()).sum()
    }

    /// Total NFT entries across all token lists.
    pub fn nft_exchange_count(&self) -> usize {
        self.token_transfers.iter().map(|t| t.nft_exchanges.len()).sum()
    }

    /// Whether the request carries any elementary transfer at all.
    pub fn is_empty(&self) -> bool {
        self.coin_adjustments.is_empty()
            && self
                .token_transfers
                .iter()
                .all(|t| t.adjustments.is_empty() && t.nft_exchanges.is_empty())
    }
}
