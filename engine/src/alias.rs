//! Alias resolution and hollow-account auto-creation.
//!
//! Maps every alias participant to a concrete account number: first the
//! request-local binding map, then persisted state, and only then the
//! injected creation delegate — invoked at most once per distinct alias
//! per request. Duplicate references that only become visible after
//! resolution (the same account named once by alias and once by number)
//! are rejected here, since resolution must run first.

use std::collections::{HashMap, HashSet};

use meridian_store::{AccountCreator, AccountStore};
use meridian_transfers::{
    AccountRef, CoinDelta, NftMove, TokenDeltas, TransferError, TransferPlan,
    TransferRequest, UnitDelta,
};
use meridian_types::{AccountId, Alias};

use crate::error::EngineError;

pub struct AliasResolver<'a> {
    accounts: &'a dyn AccountStore,
    creator: &'a dyn AccountCreator,
    bindings: HashMap<Alias, AccountId>,
}

impl<'a> AliasResolver<'a> {
    pub fn new(accounts: &'a dyn AccountStore, creator: &'a dyn AccountCreator) -> Self {
        Self {
            accounts,
            creator,
            bindings: HashMap::new(),
        }
    }

    /// Resolve a structurally valid request into a [`TransferPlan`] with
    /// concrete account numbers everywhere.
    pub fn resolve(&mut self, request: &TransferRequest) -> Result<TransferPlan, EngineError> {
        let mut plan = TransferPlan::new(request.payer);

        for adjustment in &request.coin_adjustments {
            plan.coins.push(CoinDelta {
                account: self.resolve_ref(&adjustment.account)?,
                amount: adjustment.amount,
                approval: adjustment.approval,
            });
        }
        let mut seen = HashSet::new();
        for delta in &plan.coins {
            if !seen.insert(delta.account) {
                return Err(
                    TransferError::RepeatedCoinAccount(delta.account.to_string()).into()
                );
            }
        }

        for list in &request.token_transfers {
            let mut deltas = TokenDeltas {
                token: list.token,
                units: Vec::new(),
                moves: Vec::new(),
            };
            for adjustment in &list.adjustments {
                deltas.units.push(UnitDelta {
                    account: self.resolve_ref(&adjustment.account)?,
                    amount: adjustment.amount,
                    approval: adjustment.approval,
                });
            }
            let mut seen = HashSet::new();
            for delta in &deltas.units {
                if !seen.insert(delta.account) {
                    return Err(TransferError::RepeatedTokenAccount {
                        token: list.token,
                        account: delta.account.to_string(),
                    }
                    .into());
                }
            }
            for exchange in &list.nft_exchanges {
                deltas.moves.push(NftMove {
                    sender: self.resolve_ref(&exchange.sender)?,
                    receiver: self.resolve_ref(&exchange.receiver)?,
                    // Validated positive by the structural pass.
                    serial: exchange.serial.unsigned_abs(),
                    approval: exchange.approval,
                });
            }
            plan.tokens.push(deltas);
        }

        Ok(plan)
    }

    fn resolve_ref(&mut self, reference: &AccountRef) -> Result<AccountId, EngineError> {
        let alias = match reference {
            AccountRef::Id(id) => return Ok(*id),
            AccountRef::Alias(alias) => alias,
        };
        if let Some(id) = self.bindings.get(alias) {
            return Ok(*id);
        }
        if let Some(account) = self.accounts.get_account_by_alias(alias)? {
            self.bindings.insert(alias.clone(), account.id);
            return Ok(account.id);
        }
        let id = self.creator.create_hollow_account(alias)?;
        tracing::debug!(alias = %alias, account = %id, "auto-created hollow account");
        self.bindings.insert(alias.clone(), id);
        Ok(id)
    }
}
