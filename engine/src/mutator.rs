//! The ledger mutator — the only component with side effects.
//!
//! Stages every record the plan touches in memory, validates the whole
//! delta set against the staged copies, and only then writes. A failure
//! at any point therefore writes nothing; there is no compensating
//! rollback logic to get wrong.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use meridian_store::{
    Account, AccountStore, AllowanceStore, Nft, NftStore, TokenRelationship,
    TokenRelationshipStore,
};
use meridian_transfers::{AppliedTransfer, TransferPlan};
use meridian_types::{AccountId, NftId, TokenId};

use crate::allowance::StagedAllowances;
use crate::error::EngineError;

pub struct LedgerMutator<'a> {
    accounts: &'a dyn AccountStore,
    relationships: &'a dyn TokenRelationshipStore,
    nfts: &'a dyn NftStore,
    allowances: &'a dyn AllowanceStore,
}

fn staged_account<'m>(
    store: &dyn AccountStore,
    staged: &'m mut BTreeMap<AccountId, Account>,
    id: AccountId,
) -> Result<&'m mut Account, EngineError> {
    match staged.entry(id) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let account = store
                .get_account(&id)?
                .ok_or(EngineError::InvalidAccount(id))?;
            Ok(entry.insert(account))
        }
    }
}

fn staged_relationship<'m>(
    store: &dyn TokenRelationshipStore,
    staged: &'m mut BTreeMap<(AccountId, TokenId), TokenRelationship>,
    account: AccountId,
    token: TokenId,
) -> Result<&'m mut TokenRelationship, EngineError> {
    match staged.entry((account, token)) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            // A transfer never creates the association lazily.
            let relationship = store
                .get_relationship(&account, &token)?
                .ok_or(EngineError::TokenNotAssociated { account, token })?;
            Ok(entry.insert(relationship))
        }
    }
}

fn staged_nft<'m>(
    store: &dyn NftStore,
    staged: &'m mut BTreeMap<NftId, Nft>,
    id: NftId,
) -> Result<&'m mut Nft, EngineError> {
    match staged.entry(id) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let nft = store.get_nft(&id)?.ok_or(EngineError::InvalidNft(id))?;
            Ok(entry.insert(nft))
        }
    }
}

impl<'a> LedgerMutator<'a> {
    pub fn new(
        accounts: &'a dyn AccountStore,
        relationships: &'a dyn TokenRelationshipStore,
        nfts: &'a dyn NftStore,
        allowances: &'a dyn AllowanceStore,
    ) -> Self {
        Self {
            accounts,
            relationships,
            nfts,
            allowances,
        }
    }

    /// Apply the final delta set. Called exactly once per request, after
    /// every other stage has succeeded.
    pub fn apply(
        &self,
        plan: &TransferPlan,
        allowances: &StagedAllowances,
    ) -> Result<AppliedTransfer, EngineError> {
        let mut accounts: BTreeMap<AccountId, Account> = BTreeMap::new();
        let mut relationships: BTreeMap<(AccountId, TokenId), TokenRelationship> =
            BTreeMap::new();
        let mut nfts: BTreeMap<NftId, Nft> = BTreeMap::new();

        // Native deltas: the user's, then the fee-driven ones.
        let coin_deltas = plan
            .coins
            .iter()
            .map(|d| (d.account, d.amount))
            .chain(
                plan.fee_deltas
                    .iter()
                    .filter(|d| d.token.is_none())
                    .map(|d| (d.account, d.amount)),
            );
        for (id, amount) in coin_deltas {
            let account = staged_account(self.accounts, &mut accounts, id)?;
            account.balance =
                account
                    .balance
                    .checked_add_signed(amount)
                    .ok_or(if amount < 0 {
                        EngineError::InsufficientCoinBalance(id)
                    } else {
                        EngineError::BalanceOverflow(id)
                    })?;
        }

        // Fungible deltas against relationships, maintaining each
        // account's positive-balance counter across transitions.
        let unit_deltas: Vec<(TokenId, AccountId, i64)> = plan
            .tokens
            .iter()
            .flat_map(|list| {
                list.units
                    .iter()
                    .map(move |u| (list.token, u.account, u.amount))
            })
            .chain(
                plan.fee_deltas
                    .iter()
                    .filter_map(|d| d.token.map(|t| (t, d.account, d.amount))),
            )
            .collect();
        for (token, id, amount) in unit_deltas {
            let relationship =
                staged_relationship(self.relationships, &mut relationships, id, token)?;
            if relationship.frozen {
                return Err(EngineError::TokenFrozen { account: id, token });
            }
            if !relationship.kyc_granted {
                return Err(EngineError::KycNotGranted { account: id, token });
            }
            let before = relationship.balance;
            relationship.balance =
                relationship
                    .balance
                    .checked_add_signed(amount)
                    .ok_or(if amount < 0 {
                        EngineError::InsufficientTokenBalance { account: id, token }
                    } else {
                        EngineError::BalanceOverflow(id)
                    })?;
            let after = relationship.balance;
            if before == 0 && after > 0 {
                let account = staged_account(self.accounts, &mut accounts, id)?;
                account.number_positive_balances =
                    account.number_positive_balances.saturating_add(1);
            } else if before > 0 && after == 0 {
                let account = staged_account(self.accounts, &mut accounts, id)?;
                account.number_positive_balances =
                    account.number_positive_balances.saturating_sub(1);
            }
        }

        // NFT ownership reassignment.
        for list in &plan.tokens {
            for mv in &list.moves {
                let id = NftId::new(list.token, mv.serial);
                let nft = staged_nft(self.nfts, &mut nfts, id)?;
                if nft.owner != mv.sender {
                    return Err(EngineError::WrongNftOwner {
                        nft: id,
                        claimed: mv.sender,
                    });
                }
                nft.owner = mv.receiver;
                // Single-serial approvals are single-use.
                nft.spender = None;
                let sender = staged_account(self.accounts, &mut accounts, mv.sender)?;
                sender.number_owned_nfts = sender.number_owned_nfts.saturating_sub(1);
                let receiver = staged_account(self.accounts, &mut accounts, mv.receiver)?;
                receiver.number_owned_nfts = receiver.number_owned_nfts.saturating_add(1);
            }
        }

        // Everything validated; write the staged records out.
        for account in accounts.values() {
            self.accounts.put_account(account)?;
        }
        for relationship in relationships.values() {
            self.relationships.put_relationship(relationship)?;
        }
        for nft in nfts.values() {
            self.nfts.put_nft(nft)?;
        }
        for ((owner, spender), amount) in &allowances.coin {
            self.allowances.set_coin_allowance(owner, spender, *amount)?;
        }
        for ((owner, token, spender), amount) in &allowances.tokens {
            self.allowances
                .set_token_allowance(owner, token, spender, *amount)?;
        }

        Ok(AppliedTransfer {
            adjustments: plan.adjustments(),
            assessed_fees: plan.assessed_fees.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_nullables::NullLedger;
    use meridian_transfers::{CoinDelta, FeeDelta, NftMove, TokenDeltas, UnitDelta};

    fn account_id(num: u64) -> AccountId {
        AccountId::new(0, 0, num)
    }

    fn token_id(num: u64) -> TokenId {
        TokenId::new(0, 0, num)
    }

    fn account(num: u64, balance: u64) -> Account {
        Account {
            id: account_id(num),
            balance,
            deleted: false,
            smart_contract: false,
            expired_and_pending_removal: false,
            number_positive_balances: 0,
            number_owned_nfts: 0,
            alias: None,
            key: None,
        }
    }

    fn coin_plan(from: u64, to: u64, amount: i64) -> TransferPlan {
        let mut plan = TransferPlan::new(account_id(from));
        plan.coins.push(CoinDelta {
            account: account_id(from),
            amount: -amount,
            approval: false,
        });
        plan.coins.push(CoinDelta {
            account: account_id(to),
            amount,
            approval: false,
        });
        plan
    }

    fn relationship(num: u64, token: u64, balance: u64) -> TokenRelationship {
        TokenRelationship {
            balance,
            ..TokenRelationship::open(account_id(num), token_id(token))
        }
    }

    #[test]
    fn test_coin_deltas_applied() {
        let ledger = NullLedger::new();
        AccountStore::put_account(&ledger, &account(1, 100)).unwrap();
        AccountStore::put_account(&ledger, &account(2, 50)).unwrap();
        let mutator = LedgerMutator::new(&ledger, &ledger, &ledger, &ledger);

        let applied = mutator
            .apply(&coin_plan(1, 2, 30), &StagedAllowances::default())
            .unwrap();
        assert_eq!(applied.adjustments.len(), 2);
        assert_eq!(
            AccountStore::get_account(&ledger, &account_id(1))
                .unwrap()
                .unwrap()
                .balance,
            70
        );
        assert_eq!(
            AccountStore::get_account(&ledger, &account_id(2))
                .unwrap()
                .unwrap()
                .balance,
            80
        );
    }

    #[test]
    fn test_insufficient_coin_balance_writes_nothing() {
        let ledger = NullLedger::new();
        AccountStore::put_account(&ledger, &account(1, 10)).unwrap();
        AccountStore::put_account(&ledger, &account(2, 50)).unwrap();
        let before = ledger.snapshot();
        let mutator = LedgerMutator::new(&ledger, &ledger, &ledger, &ledger);

        let result = mutator.apply(&coin_plan(1, 2, 30), &StagedAllowances::default());
        assert!(matches!(
            result,
            Err(EngineError::InsufficientCoinBalance(a)) if a == account_id(1)
        ));
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn test_unit_deltas_update_relationships_and_counters() {
        let ledger = NullLedger::new();
        let token = token_id(100);
        let mut sender = account(1, 0);
        sender.number_positive_balances = 1;
        AccountStore::put_account(&ledger, &sender).unwrap();
        AccountStore::put_account(&ledger, &account(2, 0)).unwrap();
        TokenRelationshipStore::put_relationship(&ledger, &relationship(1, 100, 40)).unwrap();
        TokenRelationshipStore::put_relationship(&ledger, &relationship(2, 100, 0)).unwrap();
        let mutator = LedgerMutator::new(&ledger, &ledger, &ledger, &ledger);

        let mut plan = TransferPlan::new(account_id(1));
        plan.tokens.push(TokenDeltas {
            token,
            units: vec![
                UnitDelta {
                    account: account_id(1),
                    amount: -40,
                    approval: false,
                },
                UnitDelta {
                    account: account_id(2),
                    amount: 40,
                    approval: false,
                },
            ],
            moves: Vec::new(),
        });
        mutator.apply(&plan, &StagedAllowances::default()).unwrap();

        let sender_rel = TokenRelationshipStore::get_relationship(&ledger, &account_id(1), &token)
            .unwrap()
            .unwrap();
        let receiver_rel =
            TokenRelationshipStore::get_relationship(&ledger, &account_id(2), &token)
                .unwrap()
                .unwrap();
        assert_eq!(sender_rel.balance, 0);
        assert_eq!(receiver_rel.balance, 40);

        // Sender went positive→zero, receiver zero→positive.
        let sender = AccountStore::get_account(&ledger, &account_id(1))
            .unwrap()
            .unwrap();
        let receiver = AccountStore::get_account(&ledger, &account_id(2))
            .unwrap()
            .unwrap();
        assert_eq!(sender.number_positive_balances, 0);
        assert_eq!(receiver.number_positive_balances, 1);
    }

    #[test]
    fn test_missing_relationship_is_not_associated() {
        let ledger = NullLedger::new();
        AccountStore::put_account(&ledger, &account(1, 0)).unwrap();
        AccountStore::put_account(&ledger, &account(2, 0)).unwrap();
        TokenRelationshipStore::put_relationship(&ledger, &relationship(1, 100, 40)).unwrap();
        let mutator = LedgerMutator::new(&ledger, &ledger, &ledger, &ledger);

        let mut plan = TransferPlan::new(account_id(1));
        plan.tokens.push(TokenDeltas {
            token: token_id(100),
            units: vec![
                UnitDelta {
                    account: account_id(1),
                    amount: -5,
                    approval: false,
                },
                UnitDelta {
                    account: account_id(2),
                    amount: 5,
                    approval: false,
                },
            ],
            moves: Vec::new(),
        });
        assert!(matches!(
            mutator.apply(&plan, &StagedAllowances::default()),
            Err(EngineError::TokenNotAssociated { .. })
        ));
    }

    #[test]
    fn test_frozen_and_kyc_relationships_rejected() {
        let ledger = NullLedger::new();
        AccountStore::put_account(&ledger, &account(1, 0)).unwrap();
        AccountStore::put_account(&ledger, &account(2, 0)).unwrap();
        let mut frozen = relationship(1, 100, 40);
        frozen.frozen = true;
        TokenRelationshipStore::put_relationship(&ledger, &frozen).unwrap();
        let mut no_kyc = relationship(2, 100, 0);
        no_kyc.kyc_granted = false;
        TokenRelationshipStore::put_relationship(&ledger, &no_kyc).unwrap();
        let mutator = LedgerMutator::new(&ledger, &ledger, &ledger, &ledger);

        let mut plan = TransferPlan::new(account_id(1));
        plan.tokens.push(TokenDeltas {
            token: token_id(100),
            units: vec![
                UnitDelta {
                    account: account_id(1),
                    amount: -5,
                    approval: false,
                },
                UnitDelta {
                    account: account_id(2),
                    amount: 5,
                    approval: false,
                },
            ],
            moves: Vec::new(),
        });
        assert!(matches!(
            mutator.apply(&plan, &StagedAllowances::default()),
            Err(EngineError::TokenFrozen { .. })
        ));

        let mut thawed = frozen.clone();
        thawed.frozen = false;
        TokenRelationshipStore::put_relationship(&ledger, &thawed).unwrap();
        assert!(matches!(
            mutator.apply(&plan, &StagedAllowances::default()),
            Err(EngineError::KycNotGranted { .. })
        ));
    }

    #[test]
    fn test_nft_move_reassigns_owner_and_counters() {
        let ledger = NullLedger::new();
        let token = token_id(200);
        let mut sender = account(1, 0);
        sender.number_owned_nfts = 2;
        AccountStore::put_account(&ledger, &sender).unwrap();
        AccountStore::put_account(&ledger, &account(2, 0)).unwrap();
        let id = NftId::new(token, 7);
        let mut nft = Nft::new(id, account_id(1));
        nft.spender = Some(account_id(9));
        NftStore::put_nft(&ledger, &nft).unwrap();
        let mutator = LedgerMutator::new(&ledger, &ledger, &ledger, &ledger);

        let mut plan = TransferPlan::new(account_id(1));
        plan.tokens.push(TokenDeltas {
            token,
            units: Vec::new(),
            moves: vec![NftMove {
                sender: account_id(1),
                receiver: account_id(2),
                serial: 7,
                approval: false,
            }],
        });
        mutator.apply(&plan, &StagedAllowances::default()).unwrap();

        let moved = NftStore::get_nft(&ledger, &id).unwrap().unwrap();
        assert_eq!(moved.owner, account_id(2));
        // The single-serial approval does not survive the move.
        assert_eq!(moved.spender, None);
        assert_eq!(
            AccountStore::get_account(&ledger, &account_id(1))
                .unwrap()
                .unwrap()
                .number_owned_nfts,
            1
        );
        assert_eq!(
            AccountStore::get_account(&ledger, &account_id(2))
                .unwrap()
                .unwrap()
                .number_owned_nfts,
            1
        );
    }

    #[test]
    fn test_wrong_owner_fails_with_no_state_change() {
        let ledger = NullLedger::new();
        let token = token_id(200);
        AccountStore::put_account(&ledger, &account(1, 0)).unwrap();
        AccountStore::put_account(&ledger, &account(2, 0)).unwrap();
        AccountStore::put_account(&ledger, &account(3, 0)).unwrap();
        let id = NftId::new(token, 2);
        NftStore::put_nft(&ledger, &Nft::new(id, account_id(3))).unwrap();
        let before = ledger.snapshot();
        let mutator = LedgerMutator::new(&ledger, &ledger, &ledger, &ledger);

        // Account 1 claims to send serial 2 but account 3 owns it.
        let mut plan = TransferPlan::new(account_id(1));
        plan.tokens.push(TokenDeltas {
            token,
            units: Vec::new(),
            moves: vec![NftMove {
                sender: account_id(1),
                receiver: account_id(2),
                serial: 2,
                approval: false,
            }],
        });
        assert!(matches!(
            mutator.apply(&plan, &StagedAllowances::default()),
            Err(EngineError::WrongNftOwner { claimed, .. }) if claimed == account_id(1)
        ));
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn test_fee_deltas_applied_with_user_deltas() {
        let ledger = NullLedger::new();
        AccountStore::put_account(&ledger, &account(1, 100)).unwrap();
        AccountStore::put_account(&ledger, &account(2, 0)).unwrap();
        AccountStore::put_account(&ledger, &account(9, 0)).unwrap();
        let mutator = LedgerMutator::new(&ledger, &ledger, &ledger, &ledger);

        let mut plan = coin_plan(1, 2, 10);
        plan.fee_deltas.push(FeeDelta {
            token: None,
            account: account_id(1),
            amount: -1,
        });
        plan.fee_deltas.push(FeeDelta {
            token: None,
            account: account_id(9),
            amount: 1,
        });
        mutator.apply(&plan, &StagedAllowances::default()).unwrap();

        // Both debits land on the sender.
        assert_eq!(
            AccountStore::get_account(&ledger, &account_id(1))
                .unwrap()
                .unwrap()
                .balance,
            89
        );
        assert_eq!(
            AccountStore::get_account(&ledger, &account_id(9))
                .unwrap()
                .unwrap()
                .balance,
            1
        );
    }

    #[test]
    fn test_staged_allowances_written_at_commit() {
        let ledger = NullLedger::new();
        AccountStore::put_account(&ledger, &account(1, 100)).unwrap();
        AccountStore::put_account(&ledger, &account(2, 0)).unwrap();
        AllowanceStore::set_coin_allowance(&ledger, &account_id(1), &account_id(2), 50)
            .unwrap();
        let mutator = LedgerMutator::new(&ledger, &ledger, &ledger, &ledger);

        let mut staged = StagedAllowances::default();
        staged.coin.insert((account_id(1), account_id(2)), 20);
        mutator.apply(&coin_plan(1, 2, 30), &staged).unwrap();

        assert_eq!(
            AllowanceStore::coin_allowance(&ledger, &account_id(1), &account_id(2)).unwrap(),
            Some(20)
        );
    }
}
