//! Nullable account auto-creation delegate.

use std::sync::{Arc, Mutex};

use meridian_store::{Account, AccountCreator, AccountStore, CreationError};
use meridian_types::{AccountId, Alias};

use crate::store::NullLedger;

/// A deterministic fake of the node's create-account handler.
///
/// Hands out sequential account numbers, persists the hollow account into
/// the shared [`NullLedger`], and records every invocation so tests can
/// assert the at-most-once-per-alias contract. Can be programmed to fail.
pub struct NullAccountCreator {
    ledger: Arc<NullLedger>,
    next_num: Mutex<u64>,
    created: Mutex<Vec<Alias>>,
    fail_with: Mutex<Option<CreationError>>,
}

impl NullAccountCreator {
    /// `first_num` is the number the first created account receives.
    pub fn new(ledger: Arc<NullLedger>, first_num: u64) -> Self {
        Self {
            ledger,
            next_num: Mutex::new(first_num),
            created: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    /// Make every subsequent invocation fail with `error`.
    pub fn fail_with(&self, error: CreationError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }

    /// Number of times the delegate was invoked (successfully or not).
    pub fn invocations(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    /// The aliases passed in, in invocation order.
    pub fn created_aliases(&self) -> Vec<Alias> {
        self.created.lock().unwrap().clone()
    }
}

impl AccountCreator for NullAccountCreator {
    fn create_hollow_account(&self, alias: &Alias) -> Result<AccountId, CreationError> {
        self.created.lock().unwrap().push(alias.clone());
        if let Some(error) = self.fail_with.lock().unwrap().clone() {
            return Err(error);
        }
        if alias.is_empty() {
            return Err(CreationError::MalformedAlias);
        }

        let mut next = self.next_num.lock().unwrap();
        let id = AccountId::new(0, 0, *next);
        *next += 1;

        let account = Account::hollow(id, alias.clone());
        self.ledger
            .put_account(&account)
            .map_err(|e| CreationError::Other(e.to_string()))?;
        Ok(id)
    }
}
