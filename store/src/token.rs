//! Token record and storage trait.

use crate::StoreError;
use meridian_types::{AccountId, CustomFee, TokenId};
use serde::{Deserialize, Serialize};

/// Whether units of a token are interchangeable or individually tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Fungible,
    NonFungible,
}

/// Per-token state kept in the ledger.
///
/// Immutable for the duration of one transfer; `total_supply` is touched
/// only by mint/burn, which live outside this engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub kind: TokenKind,
    pub deleted: bool,
    pub paused: bool,
    pub total_supply: u64,
    /// Receives newly minted supply; relevant here only as a fee-exempt
    /// collector candidate.
    pub treasury: AccountId,
    /// Ordered custom fee schedule.
    pub custom_fees: Vec<CustomFee>,
}

/// Trait for token storage operations.
pub trait TokenStore {
    fn get_token(&self, id: &TokenId) -> Result<Option<Token>, StoreError>;
    fn put_token(&self, token: &Token) -> Result<(), StoreError>;

    fn exists(&self, id: &TokenId) -> Result<bool, StoreError> {
        Ok(self.get_token(id)?.is_some())
    }
}
