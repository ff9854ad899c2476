//! Nullable ledger store — thread-safe in-memory storage for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use meridian_store::{
    Account, AccountStore, AllowanceStore, Nft, NftStore, StoreError, Token,
    TokenRelationship, TokenRelationshipStore, TokenStore,
};
use meridian_types::{AccountId, Alias, NftId, TokenId};

/// An in-memory implementation of every entity store trait.
/// Thread-safe so one instance can back both the engine and a delegate.
#[derive(Default)]
pub struct NullLedger {
    accounts: Mutex<HashMap<AccountId, Account>>,
    alias_index: Mutex<HashMap<Alias, AccountId>>,
    tokens: Mutex<HashMap<TokenId, Token>>,
    relationships: Mutex<HashMap<(AccountId, TokenId), TokenRelationship>>,
    nfts: Mutex<HashMap<NftId, Nft>>,
    coin_allowances: Mutex<HashMap<(AccountId, AccountId), u64>>,
    token_allowances: Mutex<HashMap<(AccountId, TokenId, AccountId), u64>>,
    operator_grants: Mutex<HashSet<(AccountId, TokenId, AccountId)>>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every record for before/after comparisons in tests.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            accounts: self.accounts.lock().unwrap().clone(),
            relationships: self.relationships.lock().unwrap().clone(),
            nfts: self.nfts.lock().unwrap().clone(),
            coin_allowances: self.coin_allowances.lock().unwrap().clone(),
            token_allowances: self.token_allowances.lock().unwrap().clone(),
        }
    }
}

/// A point-in-time copy of all mutable records.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerSnapshot {
    pub accounts: HashMap<AccountId, Account>,
    pub relationships: HashMap<(AccountId, TokenId), TokenRelationship>,
    pub nfts: HashMap<NftId, Nft>,
    pub coin_allowances: HashMap<(AccountId, AccountId), u64>,
    pub token_allowances: HashMap<(AccountId, TokenId, AccountId), u64>,
}

impl AccountStore for NullLedger {
    fn get_account(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(id).cloned())
    }

    fn get_account_by_alias(&self, alias: &Alias) -> Result<Option<Account>, StoreError> {
        let index = self.alias_index.lock().unwrap();
        match index.get(alias) {
            Some(id) => Ok(self.accounts.lock().unwrap().get(id).cloned()),
            None => Ok(None),
        }
    }

    fn put_account(&self, account: &Account) -> Result<(), StoreError> {
        if let Some(alias) = &account.alias {
            self.alias_index
                .lock()
                .unwrap()
                .insert(alias.clone(), account.id);
        }
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id, account.clone());
        Ok(())
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        Ok(self.accounts.lock().unwrap().len() as u64)
    }
}

impl TokenStore for NullLedger {
    fn get_token(&self, id: &TokenId) -> Result<Option<Token>, StoreError> {
        Ok(self.tokens.lock().unwrap().get(id).cloned())
    }

    fn put_token(&self, token: &Token) -> Result<(), StoreError> {
        self.tokens.lock().unwrap().insert(token.id, token.clone());
        Ok(())
    }
}

impl TokenRelationshipStore for NullLedger {
    fn get_relationship(
        &self,
        account: &AccountId,
        token: &TokenId,
    ) -> Result<Option<TokenRelationship>, StoreError> {
        Ok(self
            .relationships
            .lock()
            .unwrap()
            .get(&(*account, *token))
            .cloned())
    }

    fn put_relationship(&self, relationship: &TokenRelationship) -> Result<(), StoreError> {
        self.relationships
            .lock()
            .unwrap()
            .insert((relationship.account, relationship.token), relationship.clone());
        Ok(())
    }
}

impl NftStore for NullLedger {
    fn get_nft(&self, id: &NftId) -> Result<Option<Nft>, StoreError> {
        Ok(self.nfts.lock().unwrap().get(id).cloned())
    }

    fn put_nft(&self, nft: &Nft) -> Result<(), StoreError> {
        self.nfts.lock().unwrap().insert(nft.id, nft.clone());
        Ok(())
    }
}

impl AllowanceStore for NullLedger {
    fn coin_allowance(
        &self,
        owner: &AccountId,
        spender: &AccountId,
    ) -> Result<Option<u64>, StoreError> {
        Ok(self
            .coin_allowances
            .lock()
            .unwrap()
            .get(&(*owner, *spender))
            .copied())
    }

    fn set_coin_allowance(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u64,
    ) -> Result<(), StoreError> {
        let mut allowances = self.coin_allowances.lock().unwrap();
        if amount == 0 {
            allowances.remove(&(*owner, *spender));
        } else {
            allowances.insert((*owner, *spender), amount);
        }
        Ok(())
    }

    fn token_allowance(
        &self,
        owner: &AccountId,
        token: &TokenId,
        spender: &AccountId,
    ) -> Result<Option<u64>, StoreError> {
        Ok(self
            .token_allowances
            .lock()
            .unwrap()
            .get(&(*owner, *token, *spender))
            .copied())
    }

    fn set_token_allowance(
        &self,
        owner: &AccountId,
        token: &TokenId,
        spender: &AccountId,
        amount: u64,
    ) -> Result<(), StoreError> {
        let mut allowances = self.token_allowances.lock().unwrap();
        if amount == 0 {
            allowances.remove(&(*owner, *token, *spender));
        } else {
            allowances.insert((*owner, *token, *spender), amount);
        }
        Ok(())
    }

    fn approved_for_all(
        &self,
        owner: &AccountId,
        token: &TokenId,
        spender: &AccountId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .operator_grants
            .lock()
            .unwrap()
            .contains(&(*owner, *token, *spender)))
    }

    fn set_approved_for_all(
        &self,
        owner: &AccountId,
        token: &TokenId,
        spender: &AccountId,
        approved: bool,
    ) -> Result<(), StoreError> {
        let mut grants = self.operator_grants.lock().unwrap();
        if approved {
            grants.insert((*owner, *token, *spender));
        } else {
            grants.remove(&(*owner, *token, *spender));
        }
        Ok(())
    }
}
