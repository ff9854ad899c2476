//! Account record and storage trait.

use crate::StoreError;
use meridian_types::{AccountId, Alias, PublicKey};
use serde::{Deserialize, Serialize};

/// Per-account state kept in the ledger.
///
/// Mutated only by the ledger mutator; created by the external account
/// create-handler or by the alias auto-creation path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Native-currency balance in motes.
    pub balance: u64,
    pub deleted: bool,
    /// Whether this account backs a smart contract.
    pub smart_contract: bool,
    /// Set when the auto-renew grace period has lapsed; whether this bars
    /// the account from transfers is a per-kind parameter.
    pub expired_and_pending_removal: bool,
    /// Count of token relationships with a positive balance.
    pub number_positive_balances: u32,
    /// Count of NFT serials currently owned.
    pub number_owned_nfts: u64,
    /// The alias this account was created from, if any.
    pub alias: Option<Alias>,
    /// Absent for a hollow account (auto-created, not yet completed).
    pub key: Option<PublicKey>,
}

impl Account {
    /// A freshly auto-created hollow account: keyless, carrying only its
    /// alias and a zero balance.
    pub fn hollow(id: AccountId, alias: Alias) -> Self {
        Self {
            id,
            balance: 0,
            deleted: false,
            smart_contract: false,
            expired_and_pending_removal: false,
            number_positive_balances: 0,
            number_owned_nfts: 0,
            alias: Some(alias),
            key: None,
        }
    }

    pub fn is_hollow(&self) -> bool {
        self.key.is_none()
    }
}

/// Trait for account storage operations.
pub trait AccountStore {
    fn get_account(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;
    fn get_account_by_alias(&self, alias: &Alias) -> Result<Option<Account>, StoreError>;
    fn put_account(&self, account: &Account) -> Result<(), StoreError>;
    fn account_count(&self) -> Result<u64, StoreError>;

    fn exists(&self, id: &AccountId) -> Result<bool, StoreError> {
        Ok(self.get_account(id)?.is_some())
    }
}
