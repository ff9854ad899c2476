//! Entity usability gate.
//!
//! Decides whether an account or token may participate in the current
//! request at all. Reads are memoized so each distinct entity touches the
//! store once per request. Never mutates.

use std::collections::HashMap;

use meridian_store::{Account, AccountStore, Token, TokenStore};
use meridian_types::{AccountId, TokenId, TransferParams};

use crate::error::EngineError;

pub struct UsabilityGate<'a> {
    accounts: &'a dyn AccountStore,
    tokens: &'a dyn TokenStore,
    params: &'a TransferParams,
    account_cache: HashMap<AccountId, Account>,
    token_cache: HashMap<TokenId, Token>,
}

impl<'a> UsabilityGate<'a> {
    pub fn new(
        accounts: &'a dyn AccountStore,
        tokens: &'a dyn TokenStore,
        params: &'a TransferParams,
    ) -> Self {
        Self {
            accounts,
            tokens,
            params,
            account_cache: HashMap::new(),
            token_cache: HashMap::new(),
        }
    }

    pub fn check_account(&mut self, id: AccountId) -> Result<&Account, EngineError> {
        if !self.account_cache.contains_key(&id) {
            let account = self
                .accounts
                .get_account(&id)?
                .ok_or(EngineError::InvalidAccount(id))?;
            if account.deleted {
                return Err(EngineError::AccountDeleted(id));
            }
            if account.expired_and_pending_removal {
                // The grace-period gate is configured per entity kind.
                if account.smart_contract && self.params.expire_contracts {
                    return Err(EngineError::ContractExpired(id));
                }
                if !account.smart_contract && self.params.expire_accounts {
                    return Err(EngineError::AccountExpired(id));
                }
            }
            self.account_cache.insert(id, account);
        }
        Ok(&self.account_cache[&id])
    }

    pub fn check_token(&mut self, id: TokenId) -> Result<&Token, EngineError> {
        if !self.token_cache.contains_key(&id) {
            let token = self
                .tokens
                .get_token(&id)?
                .ok_or(EngineError::InvalidToken(id))?;
            if token.deleted {
                return Err(EngineError::TokenDeleted(id));
            }
            if token.paused {
                return Err(EngineError::TokenPaused(id));
            }
            self.token_cache.insert(id, token);
        }
        Ok(&self.token_cache[&id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_nullables::NullLedger;
    use meridian_store::{StoreError, TokenKind};
    use std::cell::Cell;

    fn account_id(num: u64) -> AccountId {
        AccountId::new(0, 0, num)
    }

    fn plain_account(num: u64) -> Account {
        Account {
            id: account_id(num),
            balance: 100,
            deleted: false,
            smart_contract: false,
            expired_and_pending_removal: false,
            number_positive_balances: 0,
            number_owned_nfts: 0,
            alias: None,
            key: None,
        }
    }

    fn plain_token(num: u64) -> Token {
        Token {
            id: TokenId::new(0, 0, num),
            kind: TokenKind::Fungible,
            deleted: false,
            paused: false,
            total_supply: 0,
            treasury: account_id(2),
            custom_fees: Vec::new(),
        }
    }

    #[test]
    fn test_absent_account_is_invalid() {
        let ledger = NullLedger::new();
        let params = TransferParams::defaults();
        let mut gate = UsabilityGate::new(&ledger, &ledger, &params);
        assert!(matches!(
            gate.check_account(account_id(5)),
            Err(EngineError::InvalidAccount(_))
        ));
    }

    #[test]
    fn test_deleted_account_rejected() {
        let ledger = NullLedger::new();
        let mut account = plain_account(5);
        account.deleted = true;
        meridian_store::AccountStore::put_account(&ledger, &account).unwrap();
        let params = TransferParams::defaults();
        let mut gate = UsabilityGate::new(&ledger, &ledger, &params);
        assert!(matches!(
            gate.check_account(account_id(5)),
            Err(EngineError::AccountDeleted(_))
        ));
    }

    #[test]
    fn test_expired_account_gated_per_kind() {
        let ledger = NullLedger::new();
        let mut account = plain_account(5);
        account.expired_and_pending_removal = true;
        meridian_store::AccountStore::put_account(&ledger, &account).unwrap();
        let mut contract = plain_account(6);
        contract.smart_contract = true;
        contract.expired_and_pending_removal = true;
        meridian_store::AccountStore::put_account(&ledger, &contract).unwrap();

        // Gate disabled: both pass.
        let params = TransferParams::defaults();
        let mut gate = UsabilityGate::new(&ledger, &ledger, &params);
        assert!(gate.check_account(account_id(5)).is_ok());
        assert!(gate.check_account(account_id(6)).is_ok());

        // Only the plain-account gate enabled.
        let params = TransferParams {
            expire_accounts: true,
            ..TransferParams::defaults()
        };
        let mut gate = UsabilityGate::new(&ledger, &ledger, &params);
        assert!(matches!(
            gate.check_account(account_id(5)),
            Err(EngineError::AccountExpired(_))
        ));
        assert!(gate.check_account(account_id(6)).is_ok());

        // Only the contract gate enabled: the contract variant is used.
        let params = TransferParams {
            expire_contracts: true,
            ..TransferParams::defaults()
        };
        let mut gate = UsabilityGate::new(&ledger, &ledger, &params);
        assert!(gate.check_account(account_id(5)).is_ok());
        assert!(matches!(
            gate.check_account(account_id(6)),
            Err(EngineError::ContractExpired(_))
        ));
    }

    #[test]
    fn test_token_usability() {
        let ledger = NullLedger::new();
        let mut deleted = plain_token(100);
        deleted.deleted = true;
        let mut paused = plain_token(101);
        paused.paused = true;
        meridian_store::TokenStore::put_token(&ledger, &deleted).unwrap();
        meridian_store::TokenStore::put_token(&ledger, &paused).unwrap();

        let params = TransferParams::defaults();
        let mut gate = UsabilityGate::new(&ledger, &ledger, &params);
        assert!(matches!(
            gate.check_token(TokenId::new(0, 0, 99)),
            Err(EngineError::InvalidToken(_))
        ));
        assert!(matches!(
            gate.check_token(TokenId::new(0, 0, 100)),
            Err(EngineError::TokenDeleted(_))
        ));
        assert!(matches!(
            gate.check_token(TokenId::new(0, 0, 101)),
            Err(EngineError::TokenPaused(_))
        ));
    }

    /// Counts reads to prove memoization: the second check must not hit
    /// the store again.
    struct CountingAccounts<'a> {
        inner: &'a NullLedger,
        reads: Cell<usize>,
    }

    impl AccountStore for CountingAccounts<'_> {
        fn get_account(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.get_account(id)
        }

        fn get_account_by_alias(
            &self,
            alias: &meridian_types::Alias,
        ) -> Result<Option<Account>, StoreError> {
            self.inner.get_account_by_alias(alias)
        }

        fn put_account(&self, account: &Account) -> Result<(), StoreError> {
            self.inner.put_account(account)
        }

        fn account_count(&self) -> Result<u64, StoreError> {
            self.inner.account_count()
        }
    }

    #[test]
    fn test_account_check_is_memoized() {
        let ledger = NullLedger::new();
        meridian_store::AccountStore::put_account(&ledger, &plain_account(5)).unwrap();
        let counting = CountingAccounts {
            inner: &ledger,
            reads: Cell::new(0),
        };
        let params = TransferParams::defaults();
        let mut gate = UsabilityGate::new(&counting, &ledger, &params);

        gate.check_account(account_id(5)).unwrap();
        gate.check_account(account_id(5)).unwrap();
        gate.check_account(account_id(5)).unwrap();
        assert_eq!(counting.reads.get(), 1);
    }
}
