//! Token relationship record — the (account, token) association.

use crate::StoreError;
use meridian_types::{AccountId, TokenId};
use serde::{Deserialize, Serialize};

/// State of one (account, token) pair. Unique per pair; created by the
/// external associate-handler, never implicitly by a transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRelationship {
    pub account: AccountId,
    pub token: TokenId,
    /// Fungible unit balance. NFT ownership is tracked per serial, not here.
    pub balance: u64,
    pub frozen: bool,
    /// Set at association time; tokens without a KYC requirement associate
    /// with the grant already in place.
    pub kyc_granted: bool,
}

impl TokenRelationship {
    /// An open, unfrozen, KYC-granted relationship with a zero balance.
    pub fn open(account: AccountId, token: TokenId) -> Self {
        Self {
            account,
            token,
            balance: 0,
            frozen: false,
            kyc_granted: true,
        }
    }
}

/// Trait for token relationship storage operations.
pub trait TokenRelationshipStore {
    fn get_relationship(
        &self,
        account: &AccountId,
        token: &TokenId,
    ) -> Result<Option<TokenRelationship>, StoreError>;
    fn put_relationship(&self, relationship: &TokenRelationship) -> Result<(), StoreError>;

    fn exists(&self, account: &AccountId, token: &TokenId) -> Result<bool, StoreError> {
        Ok(self.get_relationship(account, token)?.is_some())
    }
}
