//! Allowance storage trait.
//!
//! Three allowance shapes exist: native-currency `(owner, spender)`,
//! fungible `(owner, token, spender)`, and NFT approved-for-all
//! `(owner, token, spender)`. The per-serial NFT approval lives on the
//! [`crate::Nft`] record itself.

use crate::StoreError;
use meridian_types::{AccountId, TokenId};

/// Trait for allowance storage operations. Setting an amount of zero
/// removes the entry.
pub trait AllowanceStore {
    /// Remaining native-currency allowance granted by `owner` to `spender`.
    fn coin_allowance(
        &self,
        owner: &AccountId,
        spender: &AccountId,
    ) -> Result<Option<u64>, StoreError>;

    fn set_coin_allowance(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u64,
    ) -> Result<(), StoreError>;

    /// Remaining fungible allowance for one token.
    fn token_allowance(
        &self,
        owner: &AccountId,
        token: &TokenId,
        spender: &AccountId,
    ) -> Result<Option<u64>, StoreError>;

    fn set_token_allowance(
        &self,
        owner: &AccountId,
        token: &TokenId,
        spender: &AccountId,
        amount: u64,
    ) -> Result<(), StoreError>;

    /// Whether `spender` holds an approved-for-all grant over `owner`'s
    /// serials of `token`. Survives individual transfers.
    fn approved_for_all(
        &self,
        owner: &AccountId,
        token: &TokenId,
        spender: &AccountId,
    ) -> Result<bool, StoreError>;

    fn set_approved_for_all(
        &self,
        owner: &AccountId,
        token: &TokenId,
        spender: &AccountId,
        approved: bool,
    ) -> Result<(), StoreError>;
}
